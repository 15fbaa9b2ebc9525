mod api;
mod app;
mod components;

use app::App;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  let root = web_sys::window()
    .and_then(|w| w.document())
    .and_then(|d| {
      d.get_element_by_id("app")
    });

  match root {
    | Some(root) => {
      tracing::info!("mounting on #app");
      yew::Renderer::<App>::with_root(root)
        .render();
    }
    | None => {
      tracing::warn!(
        "no #app element, mounting on \
         body"
      );
      yew::Renderer::<App>::new().render();
    }
  }
}

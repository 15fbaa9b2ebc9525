use taskdeck_core::{
  Notice,
  NoticeId,
  NoticeKind
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ToastProps {
  pub notice:     Option<Notice>,
  pub on_dismiss: Callback<NoticeId>
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
  let Some(notice) = props.notice.clone()
  else {
    return html! {};
  };

  let kind_class = match notice.kind {
    | NoticeKind::Success => {
      "toast-success"
    }
    | NoticeKind::Error => "toast-error",
    | NoticeKind::Info => "toast-info"
  };
  let id = notice.id;
  let on_close = {
    let on_dismiss =
      props.on_dismiss.clone();
    move |_| on_dismiss.emit(id)
  };

  html! {
      <div class={classes!("toast", kind_class)} role="status">
          <div class="toast-body">
              <p class="toast-title">{ notice.kind.title() }</p>
              <p class="toast-message">{ notice.message }</p>
          </div>
          <button class="toast-close" type="button" aria-label="Dismiss" onclick={on_close}>{ "×" }</button>
      </div>
  }
}

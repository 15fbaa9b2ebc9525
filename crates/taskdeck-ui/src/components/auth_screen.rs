use taskdeck_core::forms::Field;
use taskdeck_core::{
  AuthForm,
  AuthMode
};
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  MouseEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct AuthScreenProps {
  pub form:      AuthForm,
  pub on_change: Callback<AuthForm>,
  pub on_submit: Callback<()>,
  pub on_switch: Callback<()>
}

/// Builds an `oninput` handler that
/// writes the input's value into one
/// field of a copy of the form.
fn edit(
  props: &AuthScreenProps,
  apply: fn(&mut AuthForm, String)
) -> Callback<InputEvent> {
  let form = props.form.clone();
  let on_change = props.on_change.clone();
  Callback::from(move |e: InputEvent| {
    let input: HtmlInputElement =
      e.target_unchecked_into();
    let mut next = form.clone();
    apply(&mut next, input.value());
    on_change.emit(next);
  })
}

fn field_error(
  form: &AuthForm,
  field: Field
) -> Html {
  match form.errors.get(field) {
    | Some(message) => html! {
        <span class="field-error">{ message.to_string() }</span>
    },
    | None => html! {}
  }
}

#[function_component(AuthScreen)]
pub fn auth_screen(
  props: &AuthScreenProps
) -> Html {
  let form = &props.form;
  let on_submit = {
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        on_submit.emit(());
      }
    )
  };
  let on_switch = {
    let on_switch =
      props.on_switch.clone();
    Callback::from(
      move |e: MouseEvent| {
        e.prevent_default();
        on_switch.emit(());
      }
    )
  };
  let (prompt, switch_label) =
    form.mode.switch_prompt();
  let submit_label = if form.submitting {
    "Please wait..."
  } else {
    form.mode.submit_label()
  };

  html! {
      <div class="auth-screen">
          <form class="panel auth-card" onsubmit={on_submit} novalidate=true>
              <h1>{ form.mode.heading() }</h1>
              if form.mode == AuthMode::Register {
                  <label class="field">
                      <span>{ "Name" }</span>
                      <input
                          type="text"
                          value={form.name.clone()}
                          oninput={edit(props, |f, v| f.name = v)}
                      />
                      { field_error(form, Field::Name) }
                  </label>
              }
              <label class="field">
                  <span>{ "Email" }</span>
                  <input
                      type="email"
                      value={form.email.clone()}
                      oninput={edit(props, |f, v| f.email = v)}
                  />
                  { field_error(form, Field::Email) }
              </label>
              <label class="field">
                  <span>{ "Password" }</span>
                  <input
                      type="password"
                      value={form.password.clone()}
                      oninput={edit(props, |f, v| f.password = v)}
                  />
                  { field_error(form, Field::Password) }
              </label>
              <button class="btn primary" type="submit" disabled={form.submitting}>{ submit_label }</button>
              <p class="auth-switch">
                  { prompt }
                  { " " }
                  <a href="#" onclick={on_switch}>{ switch_label }</a>
              </p>
          </form>
      </div>
  }
}

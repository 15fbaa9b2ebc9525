use taskdeck_core::forms::Field;
use taskdeck_core::shared::{
  EntityId,
  TaskPriority
};
use taskdeck_core::{
  AppState,
  Phase,
  TaskForm
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement
};
use yew::{
  Callback,
  Event,
  Html,
  InputEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  function_component,
  html
};

use super::TaskList;

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
  pub state:           AppState,
  pub task_form:       TaskForm,
  pub on_task_change:  Callback<TaskForm>,
  pub on_task_submit:  Callback<()>,
  pub on_toggle:
    Callback<(EntityId, bool)>,
  pub on_remove:       Callback<EntityId>,
  pub on_logout:       Callback<()>,
  pub on_toggle_theme: Callback<()>
}

fn field_error(
  form: &TaskForm,
  field: Field
) -> Html {
  match form.errors.get(field) {
    | Some(message) => html! {
        <span class="field-error">{ message.to_string() }</span>
    },
    | None => html! {}
  }
}

#[function_component(Dashboard)]
pub fn dashboard(
  props: &DashboardProps
) -> Html {
  let state = &props.state;
  let form = &props.task_form;
  let name = state
    .user()
    .map(|u| u.name.clone())
    .unwrap_or_default();

  let on_title = {
    let form = form.clone();
    let on_change =
      props.on_task_change.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      let mut next = form.clone();
      next.title = input.value();
      on_change.emit(next);
    })
  };
  let on_category = {
    let form = form.clone();
    let on_change =
      props.on_task_change.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      let mut next = form.clone();
      next.category = input.value();
      on_change.emit(next);
    })
  };
  let on_priority = {
    let form = form.clone();
    let on_change =
      props.on_task_change.clone();
    Callback::from(move |e: Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      match select
        .value()
        .parse::<TaskPriority>()
      {
        | Ok(priority) => {
          let mut next = form.clone();
          next.priority = priority;
          on_change.emit(next);
        }
        | Err(err) => {
          tracing::warn!(error = %err, "ignoring priority selection")
        }
      }
    })
  };
  let on_submit = {
    let on_submit =
      props.on_task_submit.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        on_submit.emit(());
      }
    )
  };
  let on_logout = {
    let on_logout =
      props.on_logout.clone();
    move |_| on_logout.emit(())
  };
  let on_toggle_theme = {
    let on_toggle_theme =
      props.on_toggle_theme.clone();
    move |_| on_toggle_theme.emit(())
  };

  html! {
      <div class="dashboard">
          <header class="topbar">
              <div class="greeting">
                  <h1>{ format!("Hello, {name}") }</h1>
                  <p class="muted">{ format!("{} pending tasks", state.pending_count()) }</p>
              </div>
              <div class="actions">
                  <button class="btn" type="button" onclick={on_toggle_theme}>{ state.theme().toggle_label() }</button>
                  <button class="btn" type="button" onclick={on_logout}>{ "Sign out" }</button>
              </div>
          </header>

          <form class="panel task-form" onsubmit={on_submit} novalidate=true>
              <label class="field">
                  <span>{ "Title" }</span>
                  <input type="text" placeholder="What needs doing?" value={form.title.clone()} oninput={on_title} />
                  { field_error(form, Field::Title) }
              </label>
              <label class="field">
                  <span>{ "Category" }</span>
                  <input type="text" placeholder="e.g. work" value={form.category.clone()} oninput={on_category} />
                  { field_error(form, Field::Category) }
              </label>
              <label class="field">
                  <span>{ "Priority" }</span>
                  <select onchange={on_priority}>
                      {
                          for TaskPriority::ALL.iter().map(|p| html! {
                              <option value={p.as_str()} selected={*p == form.priority}>{ p.label() }</option>
                          })
                      }
                  </select>
              </label>
              <button class="btn primary" type="submit" disabled={!form.can_submit()}>
                  { if form.submitting { "Adding..." } else { "Add task" } }
              </button>
          </form>

          <TaskList
              tasks={state.tasks().to_vec()}
              loading={state.phase() == Phase::Loading}
              on_toggle={props.on_toggle.clone()}
              on_remove={props.on_remove.clone()}
          />
      </div>
  }
}

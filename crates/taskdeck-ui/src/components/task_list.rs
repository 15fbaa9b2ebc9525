use taskdeck_core::shared::{
  EntityId,
  TaskDto,
  TaskPriority
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
pub struct TaskListProps {
  pub tasks:     Vec<TaskDto>,
  pub loading:   bool,
  pub on_toggle: Callback<(EntityId, bool)>,
  pub on_remove: Callback<EntityId>
}

fn priority_class(
  priority: TaskPriority
) -> &'static str {
  match priority {
    | TaskPriority::High => "priority-high",
    | TaskPriority::Medium => {
      "priority-medium"
    }
    | TaskPriority::Low => "priority-low"
  }
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  if props.loading {
    return html! {
        <div class="panel list loading" aria-busy="true">{ "Loading tasks..." }</div>
    };
  }

  if props.tasks.is_empty() {
    return html! {
        <div class="panel list empty">
            <p class="empty-title">{ "No tasks found" }</p>
            <p>{ "Add your first task to get started!" }</p>
        </div>
    };
  }

  html! {
      <ul class="panel list">
          {
              for props.tasks.iter().map(|task| {
                  let on_toggle = {
                      let on_toggle = props.on_toggle.clone();
                      let id = task.id.clone();
                      let completed = task.completed;
                      move |_| on_toggle.emit((id.clone(), completed))
                  };
                  let on_remove = {
                      let on_remove = props.on_remove.clone();
                      let id = task.id.clone();
                      move |_| on_remove.emit(id.clone())
                  };
                  let toggle_label = if task.completed { "Mark as pending" } else { "Mark as completed" };

                  html! {
                      <li key={task.id.as_str().to_string()} class={classes!("task-row", task.completed.then_some("done"))}>
                          <button class="task-toggle" type="button" title={toggle_label} onclick={on_toggle}>
                              { if task.completed { "[x]" } else { "[ ]" } }
                          </button>
                          <div class="task-body">
                              <span class="task-title">{ task.title.clone() }</span>
                              <span class="badge">{ task.category.clone() }</span>
                              <span class={classes!("badge", priority_class(task.priority))}>{ task.priority.label() }</span>
                          </div>
                          <button class="btn danger" type="button" title="Delete task" onclick={on_remove}>{ "Delete" }</button>
                      </li>
                  }
              })
          }
      </ul>
  }
}

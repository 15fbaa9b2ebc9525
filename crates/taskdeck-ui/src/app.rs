use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use taskdeck_core::notify::AUTO_DISMISS;
use taskdeck_core::shared::EntityId;
use taskdeck_core::{
  AppState,
  AuthForm,
  NoticeId,
  Phase,
  TaskForm,
  TaskdeckClient
};
use yew::{
  Callback,
  Html,
  UseStateHandle,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_state
};

use crate::api::{
  BrowserStore,
  FetchTransport,
  api_base_url
};
use crate::components::{
  AuthScreen,
  Dashboard,
  Toast
};

type Client =
  TaskdeckClient<FetchTransport, BrowserStore>;

/// Copies the client's state into the
/// render state.
fn sync(
  client: &Client,
  snapshot: &UseStateHandle<AppState>
) {
  snapshot.set(client.snapshot());
}

#[function_component(App)]
pub fn app() -> Html {
  let client: Rc<Client> =
    use_memo((), |_| {
      TaskdeckClient::new(
        FetchTransport::new(
          api_base_url()
        ),
        BrowserStore
      )
    });
  let snapshot = {
    let client = client.clone();
    use_state(move || client.snapshot())
  };
  let auth_form =
    use_state(AuthForm::default);
  let task_form = use_state(TaskForm::new);

  {
    let client = client.clone();
    let snapshot = snapshot.clone();
    use_effect_with((), move |_| {
      tracing::info!(
        api_url = api_base_url(),
        "frontend mounted"
      );
      wasm_bindgen_futures::spawn_local(
        async move {
          client.start().await;
          sync(&client, &snapshot);
        }
      );
      || ()
    });
  }

  {
    let client = client.clone();
    let snapshot = snapshot.clone();
    let notice_id: Option<NoticeId> =
      snapshot
        .feedback()
        .current()
        .map(|n| n.id);
    use_effect_with(notice_id, move |id| {
      if let Some(id) = *id {
        wasm_bindgen_futures::spawn_local(
          async move {
            TimeoutFuture::new(
              AUTO_DISMISS.as_millis()
                as u32
            )
            .await;
            if client.dismiss(id) {
              tracing::debug!(
                ?id,
                "notice auto-dismissed"
              );
              sync(&client, &snapshot);
            }
          }
        );
      }
      || ()
    });
  }

  {
    let dark = snapshot.theme().is_dark();
    use_effect_with(dark, move |dark| {
      let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
      if let Some(root) = root
        && let Err(err) = root
          .class_list()
          .toggle_with_force("dark", *dark)
      {
        tracing::warn!(
          ?err,
          "failed to apply theme class"
        );
      }
      || ()
    });
  }

  let on_auth_change = {
    let auth_form = auth_form.clone();
    Callback::from(move |next: AuthForm| {
      auth_form.set(next)
    })
  };

  let on_auth_switch = {
    let auth_form = auth_form.clone();
    Callback::from(move |_: ()| {
      let mut next = (*auth_form).clone();
      next.switch_mode();
      auth_form.set(next);
    })
  };

  let on_auth_submit = {
    let client = client.clone();
    let snapshot = snapshot.clone();
    let auth_form = auth_form.clone();
    Callback::from(move |_: ()| {
      let mut form = (*auth_form).clone();
      let Some(submission) =
        form.begin_submit()
      else {
        tracing::debug!(
          errors = %form.errors,
          "auth form rejected locally"
        );
        auth_form.set(form);
        return;
      };
      auth_form.set(form.clone());

      let client = client.clone();
      let snapshot = snapshot.clone();
      let auth_form = auth_form.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = client
            .submit_auth(submission)
            .await;
          form.finish(&outcome);
          auth_form.set(form);
          sync(&client, &snapshot);
        }
      );
    })
  };

  let on_task_change = {
    let task_form = task_form.clone();
    Callback::from(move |next: TaskForm| {
      task_form.set(next)
    })
  };

  let on_task_submit = {
    let client = client.clone();
    let snapshot = snapshot.clone();
    let task_form = task_form.clone();
    Callback::from(move |_: ()| {
      let mut form = (*task_form).clone();
      let Some(task) = form.begin_submit()
      else {
        task_form.set(form);
        return;
      };
      task_form.set(form.clone());

      let client = client.clone();
      let snapshot = snapshot.clone();
      let task_form = task_form.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome =
            client.submit_task(task).await;
          form.finish(&outcome);
          task_form.set(form);
          sync(&client, &snapshot);
        }
      );
    })
  };

  let on_toggle = {
    let client = client.clone();
    let snapshot = snapshot.clone();
    Callback::from(
      move |(id, completed): (
        EntityId,
        bool
      )| {
        let client = client.clone();
        let snapshot = snapshot.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            if let Err(err) = client
              .toggle_task(&id, completed)
              .await
            {
              tracing::debug!(%id, error = %err, "toggle failed");
            }
            sync(&client, &snapshot);
          }
        );
      }
    )
  };

  let on_remove = {
    let client = client.clone();
    let snapshot = snapshot.clone();
    Callback::from(move |id: EntityId| {
      let client = client.clone();
      let snapshot = snapshot.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          if let Err(err) =
            client.remove_task(&id).await
          {
            tracing::debug!(%id, error = %err, "remove failed");
          }
          sync(&client, &snapshot);
        }
      );
    })
  };

  let on_logout = {
    let client = client.clone();
    let snapshot = snapshot.clone();
    let task_form = task_form.clone();
    let auth_form = auth_form.clone();
    Callback::from(move |_: ()| {
      client.logout();
      task_form.set(TaskForm::new());
      auth_form.set(AuthForm::default());
      sync(&client, &snapshot);
    })
  };

  let on_toggle_theme = {
    let client = client.clone();
    let snapshot = snapshot.clone();
    Callback::from(move |_: ()| {
      let theme = client.toggle_theme();
      tracing::debug!(
        theme = theme.storage_value(),
        "theme toggled"
      );
      sync(&client, &snapshot);
    })
  };

  let on_dismiss = {
    let client = client.clone();
    let snapshot = snapshot.clone();
    Callback::from(move |id: NoticeId| {
      if client.dismiss(id) {
        sync(&client, &snapshot);
      }
    })
  };

  let state = (*snapshot).clone();

  html! {
      <div class="app">
          <Toast notice={state.feedback().current().cloned()} on_dismiss={on_dismiss} />
          if state.phase() == Phase::LoggedOut {
              <AuthScreen
                  form={(*auth_form).clone()}
                  on_change={on_auth_change}
                  on_submit={on_auth_submit}
                  on_switch={on_auth_switch}
              />
          } else {
              <Dashboard
                  state={state}
                  task_form={(*task_form).clone()}
                  on_task_change={on_task_change}
                  on_task_submit={on_task_submit}
                  on_toggle={on_toggle}
                  on_remove={on_remove}
                  on_logout={on_logout}
                  on_toggle_theme={on_toggle_theme}
              />
          }
      </div>
  }
}

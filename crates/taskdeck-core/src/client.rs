use std::cell::RefCell;

use futures::future::join;
use taskdeck_shared::{
  EntityId,
  LoginRequest,
  RegisterConfirmation,
  RegisterRequest,
  TaskCreate
};
use tracing::{
  error,
  info,
  instrument,
  warn
};

use crate::api::{
  ApiClient,
  Transport
};
use crate::error::ApiError;
use crate::forms::{
  AuthOutcome,
  AuthSubmission,
  TaskOutcome
};
use crate::notify::{
  NoticeId,
  NoticeKind
};
use crate::state::{
  AppState,
  Phase
};
use crate::storage::{
  KeyValueStore,
  TOKEN_KEY
};
use crate::theme::Theme;

/// The headless application: session,
/// task synchronization, theme and
/// feedback over one [`AppState`].
///
/// All methods take `&self`; state sits
/// in a `RefCell` that is never held
/// across an await.
pub struct TaskdeckClient<T, S> {
  api:   ApiClient<T>,
  store: S,
  state: RefCell<AppState>
}

impl<T, S> TaskdeckClient<T, S>
where
  T: Transport,
  S: KeyValueStore
{
  pub fn new(transport: T, store: S) -> Self {
    let theme = Theme::load(&store);
    let state = AppState::new(
      theme,
      store.get(TOKEN_KEY)
    );

    let api = ApiClient::new(transport);
    if let Some(token) = state.token() {
      api.set_bearer(token);
    }

    info!(
      phase = state.phase().as_str(),
      theme = theme.storage_value(),
      "client initialized"
    );

    Self {
      api,
      store,
      state: RefCell::new(state)
    }
  }

  pub fn api(&self) -> &ApiClient<T> {
    &self.api
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn snapshot(&self) -> AppState {
    self.state.borrow().clone()
  }

  pub fn with_state<R>(
    &self,
    f: impl FnOnce(&AppState) -> R
  ) -> R {
    f(&self.state.borrow())
  }

  pub fn phase(&self) -> Phase {
    self.state.borrow().phase()
  }

  /// Resumes a stored session, if any.
  pub async fn start(&self) {
    if self.phase() == Phase::Loading {
      self.load_session().await;
    }
  }

  /// Fetches profile and tasks together.
  /// A profile failure ends the session
  /// with its error notice left visible;
  /// a task failure is only reported.
  #[instrument(skip(self))]
  pub async fn load_session(&self) {
    let (profile, tasks) = join(
      self.api.me(),
      self.api.list_tasks()
    )
    .await;

    match tasks {
      | Ok(tasks) => {
        self
          .state
          .borrow_mut()
          .tasks_replaced(tasks);
      }
      | Err(err) => self.report(&err)
    }

    match profile {
      | Ok(user) => {
        self
          .state
          .borrow_mut()
          .profile_loaded(user);
      }
      | Err(err) => {
        self.report(&err);
        warn!(
          "profile fetch failed; \
           forcing logout"
        );
        self.end_session();
      }
    }

    self.state.borrow_mut().load_finished();
    info!(
      phase = self.phase().as_str(),
      "session load finished"
    );
  }

  #[instrument(skip_all)]
  pub async fn login(
    &self,
    request: &LoginRequest
  ) -> Result<(), ApiError> {
    let auth = match self
      .api
      .login(request)
      .await
    {
      | Ok(auth) => auth,
      | Err(err) => {
        self.report(&err);
        return Err(err);
      }
    };

    if let Err(error) =
      self.store.set(TOKEN_KEY, &auth.token)
    {
      warn!(
        %error,
        "failed to persist session token"
      );
    }
    self.api.set_bearer(&auth.token);

    let name = auth.user.name.clone();
    self.state.borrow_mut().signed_in(auth);
    self.notify(
      NoticeKind::Success,
      if name.is_empty() {
        "Welcome back!".to_string()
      } else {
        format!("Welcome back, {name}!")
      }
    );

    self.load_session().await;
    Ok(())
  }

  #[instrument(skip_all)]
  pub async fn register(
    &self,
    request: &RegisterRequest
  ) -> Result<
    RegisterConfirmation,
    ApiError
  > {
    match self.api.register(request).await
    {
      | Ok(confirmation) => {
        info!("account registered");
        self.notify(
          NoticeKind::Success,
          "Account created! Sign in to \
           continue."
        );
        Ok(confirmation)
      }
      | Err(err) => {
        self.report(&err);
        Err(err)
      }
    }
  }

  pub fn logout(&self) {
    self.end_session();
    self.notify(
      NoticeKind::Info,
      "You have signed out"
    );
  }

  fn end_session(&self) {
    self.api.clear_bearer();
    if let Err(error) =
      self.store.remove(TOKEN_KEY)
    {
      warn!(
        %error,
        "failed to remove session token"
      );
    }
    self.state.borrow_mut().signed_out();
  }

  /// Replaces the local task collection
  /// with the server's.
  #[instrument(skip(self))]
  pub async fn sync_tasks(
    &self
  ) -> Result<(), ApiError> {
    match self.api.list_tasks().await {
      | Ok(tasks) => {
        self
          .state
          .borrow_mut()
          .tasks_replaced(tasks);
        Ok(())
      }
      | Err(err) => {
        self.report(&err);
        Err(err)
      }
    }
  }

  #[instrument(skip_all)]
  pub async fn create_task(
    &self,
    task: &TaskCreate
  ) -> Result<(), ApiError> {
    if let Err(err) =
      self.api.create_task(task).await
    {
      self.report(&err);
      return Err(err);
    }

    self
      .after_mutation("Task added")
      .await;
    Ok(())
  }

  /// Sends the negation of `completed`.
  #[instrument(skip(self))]
  pub async fn toggle_task(
    &self,
    id: &EntityId,
    completed: bool
  ) -> Result<(), ApiError> {
    let next = !completed;
    if let Err(err) = self
      .api
      .set_completed(id, next)
      .await
    {
      self.report(&err);
      return Err(err);
    }

    self
      .after_mutation(if next {
        "Task marked as completed"
      } else {
        "Task marked as pending"
      })
      .await;
    Ok(())
  }

  #[instrument(skip(self))]
  pub async fn remove_task(
    &self,
    id: &EntityId
  ) -> Result<(), ApiError> {
    if let Err(err) =
      self.api.delete_task(id).await
    {
      self.report(&err);
      return Err(err);
    }

    self
      .after_mutation("Task removed")
      .await;
    Ok(())
  }

  /// Sends an already validated auth
  /// form.
  pub async fn submit_auth(
    &self,
    submission: AuthSubmission
  ) -> AuthOutcome {
    match submission {
      | AuthSubmission::Login(req) => {
        match self.login(&req).await {
          | Ok(()) => AuthOutcome::SignedIn,
          | Err(_) => AuthOutcome::Failed
        }
      }
      | AuthSubmission::Register(req) => {
        match self.register(&req).await {
          | Ok(_) => AuthOutcome::Registered,
          | Err(_) => AuthOutcome::Failed
        }
      }
    }
  }

  pub async fn submit_task(
    &self,
    task: TaskCreate
  ) -> TaskOutcome {
    match self.create_task(&task).await {
      | Ok(()) => TaskOutcome::Created,
      | Err(_) => TaskOutcome::Failed
    }
  }

  pub fn toggle_theme(&self) -> Theme {
    let next =
      self.state.borrow().theme().toggled();
    next.save(&self.store);
    self
      .state
      .borrow_mut()
      .theme_changed(next);
    next
  }

  pub fn notify(
    &self,
    kind: NoticeKind,
    message: impl Into<String>
  ) -> NoticeId {
    self
      .state
      .borrow_mut()
      .notify(kind, message)
  }

  pub fn dismiss(
    &self,
    id: NoticeId
  ) -> bool {
    self.state.borrow_mut().dismiss(id)
  }

  /// Every mutation ends here: a full
  /// refresh, then the success notice.
  /// A failed refresh keeps its error
  /// notice visible instead.
  async fn after_mutation(
    &self,
    success: &str
  ) {
    if self.sync_tasks().await.is_ok() {
      self.notify(
        NoticeKind::Success,
        success
      );
    }
  }

  /// Shows the error notice. A 401 while
  /// signed in ends the session and
  /// leaves that notice visible.
  fn report(&self, err: &ApiError) {
    error!(error = %err, "api call failed");
    let message = err.user_message();
    self.notify(NoticeKind::Error, message);

    if err.is_unauthorized()
      && self.phase() == Phase::LoggedIn
    {
      warn!("session rejected by server");
      self.end_session();
    }
  }
}

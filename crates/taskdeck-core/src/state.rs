use taskdeck_shared::{
  AuthResult,
  TaskDto,
  UserDto
};
use tracing::debug;

use crate::notify::{
  NoticeId,
  NoticeKind,
  Notifier
};
use crate::theme::Theme;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Phase {
  LoggedOut,
  Loading,
  LoggedIn
}

impl Phase {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::LoggedOut => "logged-out",
      | Self::Loading => "loading",
      | Self::LoggedIn => "logged-in"
    }
  }
}

/// Everything the client knows. Only
/// the transition methods below change
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
  phase:    Phase,
  token:    Option<String>,
  user:     Option<UserDto>,
  tasks:    Vec<TaskDto>,
  theme:    Theme,
  feedback: Notifier
}

impl AppState {
  /// Starting state. A stored token puts
  /// the app straight into `Loading`.
  pub fn new(
    theme: Theme,
    stored_token: Option<String>
  ) -> Self {
    let token = stored_token
      .filter(|t| !t.trim().is_empty());
    let phase = if token.is_some() {
      Phase::Loading
    } else {
      Phase::LoggedOut
    };

    Self {
      phase,
      token,
      user: None,
      tasks: Vec::new(),
      theme,
      feedback: Notifier::new()
    }
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  pub fn user(&self) -> Option<&UserDto> {
    self.user.as_ref()
  }

  pub fn tasks(&self) -> &[TaskDto] {
    &self.tasks
  }

  pub fn theme(&self) -> Theme {
    self.theme
  }

  pub fn feedback(&self) -> &Notifier {
    &self.feedback
  }

  pub fn is_authenticated(&self) -> bool {
    self.token.is_some()
  }

  pub fn pending_count(&self) -> usize {
    self
      .tasks
      .iter()
      .filter(|t| !t.completed)
      .count()
  }

  pub fn signed_in(
    &mut self,
    auth: AuthResult
  ) {
    debug!(
      user = %auth.user.id,
      "session started"
    );
    self.token = Some(auth.token);
    self.user = Some(auth.user);
    self.phase = Phase::Loading;
  }

  pub fn profile_loaded(
    &mut self,
    user: UserDto
  ) {
    if self.is_authenticated() {
      self.user = Some(user);
    }
  }

  /// Replaces the whole collection.
  /// Ignored once the session is gone.
  pub fn tasks_replaced(
    &mut self,
    tasks: Vec<TaskDto>
  ) {
    if self.is_authenticated() {
      debug!(
        count = tasks.len(),
        "task collection replaced"
      );
      self.tasks = tasks;
    }
  }

  pub fn load_finished(&mut self) {
    if self.phase == Phase::Loading
      && self.is_authenticated()
    {
      self.phase = Phase::LoggedIn;
    }
  }

  pub fn signed_out(&mut self) {
    debug!(
      from = self.phase.as_str(),
      "session cleared"
    );
    self.token = None;
    self.user = None;
    self.tasks.clear();
    self.phase = Phase::LoggedOut;
  }

  pub fn theme_changed(
    &mut self,
    theme: Theme
  ) {
    self.theme = theme;
  }

  pub fn notify(
    &mut self,
    kind: NoticeKind,
    message: impl Into<String>
  ) -> NoticeId {
    self.feedback.show(kind, message)
  }

  pub fn dismiss(
    &mut self,
    id: NoticeId
  ) -> bool {
    self.feedback.dismiss(id)
  }
}

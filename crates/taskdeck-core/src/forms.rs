//! Auth and task form controllers.
//!
//! Forms validate locally before any
//! request leaves the client. A form
//! that fails validation never reaches
//! the API.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use taskdeck_shared::{
  LoginRequest,
  RegisterRequest,
  TaskCreate,
  TaskPriority
};

pub const PASSWORD_MIN_LEN: usize = 6;
pub const TITLE_MIN_LEN: usize = 3;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub enum Field {
  Name,
  Email,
  Password,
  Title,
  Category
}

impl Field {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Name => "name",
      | Self::Email => "email",
      | Self::Password => "password",
      | Self::Title => "title",
      | Self::Category => "category"
    }
  }
}

/// Per-field validation messages.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct ValidationErrors {
  fields: BTreeMap<Field, String>
}

impl ValidationErrors {
  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn get(
    &self,
    field: Field
  ) -> Option<&str> {
    self
      .fields
      .get(&field)
      .map(String::as_str)
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (Field, &str)>
  {
    self
      .fields
      .iter()
      .map(|(f, m)| (*f, m.as_str()))
  }

  fn add(
    &mut self,
    field: Field,
    message: &str
  ) {
    self
      .fields
      .entry(field)
      .or_insert_with(|| {
        message.to_string()
      });
  }

  fn into_result<T>(
    self,
    value: impl FnOnce() -> T
  ) -> Result<T, Self> {
    if self.is_empty() {
      Ok(value())
    } else {
      Err(self)
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      first = false;
      write!(
        f,
        "{}: {message}",
        field.as_str()
      )?;
    }
    Ok(())
  }
}

impl std::error::Error
  for ValidationErrors
{
}

fn email_pattern() -> Option<&'static Regex>
{
  static EMAIL_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  EMAIL_RE
    .get_or_init(|| {
      Regex::new(
        r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$"
      )
      .ok()
    })
    .as_ref()
}

pub fn is_valid_email(raw: &str) -> bool {
  email_pattern()
    .is_some_and(|re| re.is_match(raw))
}

fn check_email(
  errors: &mut ValidationErrors,
  email: &str
) {
  if email.is_empty() {
    errors.add(
      Field::Email,
      "Email is required"
    );
  } else if !is_valid_email(email) {
    errors
      .add(Field::Email, "Invalid email");
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum AuthMode {
  #[default]
  Login,
  Register
}

impl AuthMode {
  pub fn other(self) -> Self {
    match self {
      | Self::Login => Self::Register,
      | Self::Register => Self::Login
    }
  }

  pub fn heading(self) -> &'static str {
    match self {
      | Self::Login => {
        "Sign in to your account"
      }
      | Self::Register => {
        "Create your account"
      }
    }
  }

  pub fn submit_label(
    self
  ) -> &'static str {
    match self {
      | Self::Login => "Sign in",
      | Self::Register => "Register"
    }
  }

  pub fn switch_prompt(
    self
  ) -> (&'static str, &'static str) {
    match self {
      | Self::Login => (
        "Don't have an account?",
        "Create account"
      ),
      | Self::Register => (
        "Already have an account?",
        "Sign in"
      )
    }
  }
}

/// Validated auth input, ready to send.
#[derive(Debug, Clone)]
pub enum AuthSubmission {
  Login(LoginRequest),
  Register(RegisterRequest)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
  SignedIn,
  Registered,
  Failed
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct AuthForm {
  pub mode:       AuthMode,
  pub name:       String,
  pub email:      String,
  pub password:   String,
  pub errors:     ValidationErrors,
  pub submitting: bool
}

impl AuthForm {
  pub fn new(mode: AuthMode) -> Self {
    Self {
      mode,
      ..Self::default()
    }
  }

  /// Flips between login and register,
  /// clearing every field.
  pub fn switch_mode(&mut self) {
    *self = Self::new(self.mode.other());
  }

  pub fn validate(
    &self
  ) -> Result<
    AuthSubmission,
    ValidationErrors
  > {
    let mut errors =
      ValidationErrors::default();
    let name = self.name.trim();
    let email = self.email.trim();

    if self.mode == AuthMode::Register
      && name.is_empty()
    {
      errors.add(
        Field::Name,
        "Name is required"
      );
    }

    check_email(&mut errors, email);

    if self.password.is_empty() {
      errors.add(
        Field::Password,
        "Password is required"
      );
    } else if self.mode
      == AuthMode::Register
      && self.password.chars().count()
        < PASSWORD_MIN_LEN
    {
      errors.add(
        Field::Password,
        "Minimum 6 characters"
      );
    }

    errors.into_result(|| {
      match self.mode {
        | AuthMode::Login => {
          AuthSubmission::Login(
            LoginRequest {
              email:    email
                .to_string(),
              password: self
                .password
                .clone()
            }
          )
        }
        | AuthMode::Register => {
          AuthSubmission::Register(
            RegisterRequest {
              name:     name.to_string(),
              email:    email
                .to_string(),
              password: self
                .password
                .clone()
            }
          )
        }
      }
    })
  }

  /// Validates and marks the form busy.
  /// Returns `None` when validation
  /// failed; the errors are kept on the
  /// form.
  pub fn begin_submit(
    &mut self
  ) -> Option<AuthSubmission> {
    if self.submitting {
      return None;
    }
    match self.validate() {
      | Ok(submission) => {
        self.errors =
          ValidationErrors::default();
        self.submitting = true;
        Some(submission)
      }
      | Err(errors) => {
        self.errors = errors;
        None
      }
    }
  }

  pub fn finish(
    &mut self,
    outcome: &AuthOutcome
  ) {
    self.submitting = false;
    match outcome {
      | AuthOutcome::Registered => {
        *self =
          Self::new(AuthMode::Login);
      }
      | AuthOutcome::SignedIn => {
        *self = Self::new(self.mode);
      }
      | AuthOutcome::Failed => {}
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
  Created,
  Failed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
  pub title:      String,
  pub category:   String,
  pub priority:   TaskPriority,
  pub errors:     ValidationErrors,
  pub submitting: bool
}

impl Default for TaskForm {
  fn default() -> Self {
    Self {
      title:      String::new(),
      category:   String::new(),
      priority:   TaskPriority::Medium,
      errors:     ValidationErrors::default(),
      submitting: false
    }
  }
}

impl TaskForm {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether any field differs from the
  /// blank form.
  pub fn is_dirty(&self) -> bool {
    let blank = Self::default();
    self.title != blank.title
      || self.category != blank.category
      || self.priority != blank.priority
  }

  pub fn can_submit(&self) -> bool {
    !self.submitting && self.is_dirty()
  }

  pub fn validate(
    &self
  ) -> Result<TaskCreate, ValidationErrors>
  {
    let mut errors =
      ValidationErrors::default();
    let title = self.title.trim();
    let category = self.category.trim();

    if title.is_empty() {
      errors.add(
        Field::Title,
        "Title is required"
      );
    } else if title.chars().count()
      < TITLE_MIN_LEN
    {
      errors.add(
        Field::Title,
        "Minimum 3 characters"
      );
    }

    if category.is_empty() {
      errors.add(
        Field::Category,
        "Category is required"
      );
    }

    errors.into_result(|| TaskCreate {
      title:    title.to_string(),
      priority: self.priority,
      category: category.to_string()
    })
  }

  pub fn begin_submit(
    &mut self
  ) -> Option<TaskCreate> {
    if self.submitting {
      return None;
    }
    match self.validate() {
      | Ok(task) => {
        self.errors =
          ValidationErrors::default();
        self.submitting = true;
        Some(task)
      }
      | Err(errors) => {
        self.errors = errors;
        None
      }
    }
  }

  pub fn finish(
    &mut self,
    outcome: &TaskOutcome
  ) {
    self.submitting = false;
    match outcome {
      | TaskOutcome::Created => {
        *self = Self::default();
      }
      | TaskOutcome::Failed => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn register_form(
    password: &str
  ) -> AuthForm {
    AuthForm {
      mode: AuthMode::Register,
      name: "Ana Souza".to_string(),
      email: "ana@example.com"
        .to_string(),
      password: password.to_string(),
      ..AuthForm::default()
    }
  }

  #[test]
  fn register_requires_six_char_password()
  {
    let errors = register_form("12345")
      .validate()
      .expect_err("5 chars too short");
    assert_eq!(
      errors.get(Field::Password),
      Some("Minimum 6 characters")
    );

    assert!(matches!(
      register_form("123456").validate(),
      Ok(AuthSubmission::Register(_))
    ));
  }

  #[test]
  fn login_accepts_short_password() {
    let form = AuthForm {
      email: "ana@example.com"
        .to_string(),
      password: "x".to_string(),
      ..AuthForm::new(AuthMode::Login)
    };
    assert!(matches!(
      form.validate(),
      Ok(AuthSubmission::Login(_))
    ));
  }

  #[test]
  fn login_flags_every_missing_field() {
    let errors = AuthForm::default()
      .validate()
      .expect_err("blank form");
    assert_eq!(
      errors.get(Field::Email),
      Some("Email is required")
    );
    assert_eq!(
      errors.get(Field::Password),
      Some("Password is required")
    );
    assert_eq!(errors.get(Field::Name), None);
  }

  #[test]
  fn register_requires_name() {
    let mut form = register_form("secret1");
    form.name = "   ".to_string();
    let errors = form
      .validate()
      .expect_err("blank name");
    assert_eq!(
      errors.get(Field::Name),
      Some("Name is required")
    );
  }

  #[test]
  fn email_format() {
    assert!(is_valid_email("a@b.co"));
    assert!(is_valid_email(
      "first.last@mail.example.org"
    ));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a b@c.com"));
    assert!(!is_valid_email("@c.com"));
    assert!(!is_valid_email("a@.com"));
  }

  #[test]
  fn switching_mode_resets_fields() {
    let mut form = register_form("abc");
    form.switch_mode();
    assert_eq!(
      form,
      AuthForm::new(AuthMode::Login)
    );
  }

  #[test]
  fn registered_outcome_returns_to_login()
  {
    let mut form = register_form("secret1");
    assert!(form.begin_submit().is_some());
    assert!(form.submitting);
    form.finish(&AuthOutcome::Registered);
    assert_eq!(form.mode, AuthMode::Login);
    assert!(!form.submitting);
    assert!(form.email.is_empty());
  }

  #[test]
  fn task_title_needs_three_chars() {
    let mut form = TaskForm {
      title: "ab".to_string(),
      category: "home".to_string(),
      ..TaskForm::new()
    };
    let errors = form
      .validate()
      .expect_err("2 chars too short");
    assert_eq!(
      errors.get(Field::Title),
      Some("Minimum 3 characters")
    );

    form.title = "abc".to_string();
    form.priority = TaskPriority::High;
    assert_eq!(
      form.validate(),
      Ok(TaskCreate {
        title:    "abc".to_string(),
        priority: TaskPriority::High,
        category: "home".to_string()
      })
    );
  }

  #[test]
  fn task_form_submit_gating() {
    let mut form = TaskForm::new();
    assert!(!form.is_dirty());
    assert!(!form.can_submit());

    form.priority = TaskPriority::Low;
    assert!(form.is_dirty());
    assert!(form.can_submit());

    form.title = "Water plants".to_string();
    form.category = "home".to_string();
    assert!(form.begin_submit().is_some());
    assert!(!form.can_submit());
    assert!(form.begin_submit().is_none());

    form.finish(&TaskOutcome::Created);
    assert_eq!(form, TaskForm::new());
  }

  #[test]
  fn failed_task_submit_keeps_input() {
    let mut form = TaskForm {
      title: "Call mom".to_string(),
      category: "family".to_string(),
      ..TaskForm::new()
    };
    assert!(form.begin_submit().is_some());
    form.finish(&TaskOutcome::Failed);
    assert_eq!(form.title, "Call mom");
    assert!(form.can_submit());
  }
}

use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Deserializer,
  Serialize
};

/// Paths below the API base URL.
pub mod routes {
  pub const REGISTER: &str =
    "/users/register";
  pub const LOGIN: &str =
    "/users/login";
  pub const ME: &str = "/users/me";
  pub const TASKS: &str =
    "/todos/getTasks";
  pub const CREATE_TASK: &str =
    "/todos/sendTask";
  pub const TASK_PREFIX: &str =
    "/todos/";

  /// The id always lands in a single
  /// path segment.
  pub fn task(id: &str) -> String {
    format!(
      "{TASK_PREFIX}{}",
      urlencoding::encode(id)
    )
  }
}

/// Server-assigned identifier. The API
/// hands these out either as numbers or
/// strings, so they are kept opaque.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
  pub fn new(
    raw: impl Into<String>
  ) -> Self {
    Self(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for EntityId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for EntityId {
  fn from(raw: &str) -> Self {
    Self(raw.to_string())
  }
}

/// `.` and `..` collapse out of a URL
/// path even when percent-encoded.
pub fn is_dot_segment(id: &str) -> bool {
  matches!(id, "." | "..")
}

impl<'de> Deserialize<'de> for EntityId {
  fn deserialize<D>(
    deserializer: D
  ) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Text(String),
      Unsigned(u64),
      Signed(i64)
    }

    let id = match Raw::deserialize(
      deserializer
    )? {
      | Raw::Text(text) => text,
      | Raw::Unsigned(n) => {
        n.to_string()
      }
      | Raw::Signed(n) => n.to_string()
    };

    if id.trim().is_empty() {
      return Err(
        serde::de::Error::custom(
          "identifier must not be \
           empty"
        )
      );
    }
    if is_dot_segment(&id) {
      return Err(
        serde::de::Error::custom(
          format!(
            "identifier {id:?} is not \
             addressable"
          )
        )
      );
    }
    Ok(Self(id))
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
  #[serde(alias = "baixa")]
  Low,
  #[default]
  #[serde(
    alias = "média",
    alias = "media"
  )]
  Medium,
  #[serde(alias = "alta")]
  High
}

impl TaskPriority {
  pub const ALL: [TaskPriority; 3] = [
    TaskPriority::Low,
    TaskPriority::Medium,
    TaskPriority::High
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Low => "low",
      | Self::Medium => "medium",
      | Self::High => "high"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Low => "Low priority",
      | Self::Medium => {
        "Medium priority"
      }
      | Self::High => "High priority"
    }
  }
}

impl fmt::Display for TaskPriority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct UnknownPriority(
  pub String
);

impl fmt::Display for UnknownPriority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "unknown priority `{}` \
       (expected low, medium or high)",
      self.0
    )
  }
}

impl std::error::Error
  for UnknownPriority
{
}

impl FromStr for TaskPriority {
  type Err = UnknownPriority;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str()
    {
      | "low" | "baixa" => Ok(Self::Low),
      | "medium" | "média"
      | "media" => Ok(Self::Medium),
      | "high" | "alta" => {
        Ok(Self::High)
      }
      | other => Err(UnknownPriority(
        other.to_string()
      ))
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct UserDto {
  pub id:    EntityId,
  #[serde(default)]
  pub name:  String,
  #[serde(default)]
  pub email: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct TaskDto {
  pub id:        EntityId,
  pub title:     String,
  #[serde(default)]
  pub category:  String,
  #[serde(default)]
  pub priority:  TaskPriority,
  #[serde(default)]
  pub completed: bool
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct AuthResult {
  pub token: String,
  pub user:  UserDto
}

/// Whatever the register endpoint
/// answers with. Only the message is
/// interesting to the client.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct RegisterConfirmation {
  #[serde(default)]
  pub message: Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct LoginRequest {
  pub email:    String,
  pub password: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct RegisterRequest {
  pub name:     String,
  pub email:    String,
  pub password: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct TaskCreate {
  pub title:    String,
  pub priority: TaskPriority,
  pub category: String
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct TaskCompletionPatch {
  pub completed: bool
}

/// Error payload returned by the API on
/// non-success statuses.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
)]
pub struct ErrorBody {
  #[serde(default)]
  pub error: Option<String>
}

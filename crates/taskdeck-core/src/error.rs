//! Error types for the Taskdeck client.

use thiserror::Error;

/// Shown when the server gave no
/// message of its own.
pub const GENERIC_ERROR_MESSAGE: &str =
  "Something went wrong";

/// Failures talking to the remote API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
  /// The request never produced a
  /// response.
  #[error("request failed: {0}")]
  Transport(String),

  /// The server answered with a
  /// non-success status.
  #[error(
    "server responded with status \
     {status}{}",
    message_suffix(.message)
  )]
  Status {
    status:  u16,
    message: Option<String>
  },

  /// The response body did not match
  /// the expected schema.
  #[error(
    "malformed response from \
     {endpoint}: {reason}"
  )]
  Malformed {
    endpoint: String,
    reason:   String
  }
}

impl ApiError {
  /// Message fit for a notification:
  /// the server's own error text when
  /// it sent one, otherwise the generic
  /// fallback.
  pub fn user_message(&self) -> String {
    match self {
      | Self::Status {
        message: Some(message),
        ..
      } if !message.trim().is_empty() => {
        message.clone()
      }
      | _ => {
        GENERIC_ERROR_MESSAGE
          .to_string()
      }
    }
  }

  pub fn is_unauthorized(&self) -> bool {
    matches!(
      self,
      Self::Status {
        status: 401,
        ..
      }
    )
  }
}

fn message_suffix(
  message: &Option<String>
) -> String {
  message
    .as_deref()
    .map(|m| format!(": {m}"))
    .unwrap_or_default()
}

/// A write to the durable key/value
/// store failed.
#[derive(Debug, Clone, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn server_message_wins_over_fallback()
  {
    let err = ApiError::Status {
      status:  400,
      message: Some(
        "Email already registered"
          .to_string()
      )
    };
    assert_eq!(
      err.user_message(),
      "Email already registered"
    );
    assert_eq!(
      err.to_string(),
      "server responded with status \
       400: Email already registered"
    );
  }

  #[test]
  fn fallback_for_everything_else() {
    let blank = ApiError::Status {
      status:  500,
      message: Some("  ".to_string())
    };
    assert_eq!(
      blank.user_message(),
      GENERIC_ERROR_MESSAGE
    );

    let transport = ApiError::Transport(
      "connection refused".to_string()
    );
    assert_eq!(
      transport.user_message(),
      GENERIC_ERROR_MESSAGE
    );
  }

  #[test]
  fn unauthorized_statuses() {
    assert!(
      ApiError::Status {
        status:  401,
        message: None
      }
      .is_unauthorized()
    );
    assert!(
      !ApiError::Status {
        status:  403,
        message: Some(
          "Not your task".to_string()
        )
      }
      .is_unauthorized()
    );
    assert!(
      !ApiError::Transport(String::new())
        .is_unauthorized()
    );
  }
}

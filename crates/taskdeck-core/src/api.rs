use std::cell::RefCell;

use serde::Serialize;
use serde::de::DeserializeOwned;
use taskdeck_shared::{
  AuthResult,
  EntityId,
  ErrorBody,
  LoginRequest,
  RegisterConfirmation,
  RegisterRequest,
  TaskCompletionPatch,
  TaskCreate,
  TaskDto,
  UserDto,
  routes
};
use tracing::{
  debug,
  instrument
};

use crate::error::ApiError;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Method {
  Get,
  Post,
  Put,
  Delete
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Get => "GET",
      | Self::Post => "POST",
      | Self::Put => "PUT",
      | Self::Delete => "DELETE"
    }
  }
}

/// One call against the API, relative
/// to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  pub path:   String,
  pub bearer: Option<String>,
  pub body:   Option<serde_json::Value>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub body:   String
}

impl ApiResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Moves requests over the wire.
///
/// Implementations only deal in raw
/// status codes and bodies; schema
/// checks happen in [`ApiClient`].
#[allow(async_fn_in_trait)]
pub trait Transport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<ApiResponse, ApiError>;
}

/// Typed wrapper over a [`Transport`]
/// that owns the default bearer
/// credential.
pub struct ApiClient<T> {
  transport: T,
  bearer:    RefCell<Option<String>>
}

impl<T: Transport> ApiClient<T> {
  pub fn new(transport: T) -> Self {
    Self {
      transport,
      bearer: RefCell::new(None)
    }
  }

  pub fn set_bearer(&self, token: &str) {
    *self.bearer.borrow_mut() =
      Some(token.to_string());
  }

  pub fn clear_bearer(&self) {
    *self.bearer.borrow_mut() = None;
  }

  pub fn has_bearer(&self) -> bool {
    self.bearer.borrow().is_some()
  }

  #[instrument(skip_all)]
  pub async fn register(
    &self,
    request: &RegisterRequest
  ) -> Result<
    RegisterConfirmation,
    ApiError
  > {
    let response = self
      .call(
        Method::Post,
        routes::REGISTER,
        Some(encode(request)?)
      )
      .await?;
    Ok(parse_confirmation(&response))
  }

  #[instrument(skip_all)]
  pub async fn login(
    &self,
    request: &LoginRequest
  ) -> Result<AuthResult, ApiError> {
    let response = self
      .call(
        Method::Post,
        routes::LOGIN,
        Some(encode(request)?)
      )
      .await?;
    let auth: AuthResult =
      decode(routes::LOGIN, &response)?;
    if auth.token.trim().is_empty() {
      return Err(ApiError::Malformed {
        endpoint: routes::LOGIN
          .to_string(),
        reason:   "empty token"
          .to_string()
      });
    }
    Ok(auth)
  }

  #[instrument(skip_all)]
  pub async fn me(
    &self
  ) -> Result<UserDto, ApiError> {
    let response = self
      .call(Method::Get, routes::ME, None)
      .await?;
    decode(routes::ME, &response)
  }

  #[instrument(skip_all)]
  pub async fn list_tasks(
    &self
  ) -> Result<Vec<TaskDto>, ApiError> {
    let response = self
      .call(
        Method::Get,
        routes::TASKS,
        None
      )
      .await?;
    decode(routes::TASKS, &response)
  }

  #[instrument(skip_all)]
  pub async fn create_task(
    &self,
    task: &TaskCreate
  ) -> Result<(), ApiError> {
    self
      .call(
        Method::Post,
        routes::CREATE_TASK,
        Some(encode(task)?)
      )
      .await
      .map(|_| ())
  }

  #[instrument(skip(self))]
  pub async fn set_completed(
    &self,
    id: &EntityId,
    completed: bool
  ) -> Result<(), ApiError> {
    let patch =
      TaskCompletionPatch { completed };
    self
      .call(
        Method::Put,
        &routes::task(id.as_str()),
        Some(encode(&patch)?)
      )
      .await
      .map(|_| ())
  }

  #[instrument(skip(self))]
  pub async fn delete_task(
    &self,
    id: &EntityId
  ) -> Result<(), ApiError> {
    self
      .call(
        Method::Delete,
        &routes::task(id.as_str()),
        None
      )
      .await
      .map(|_| ())
  }

  async fn call(
    &self,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>
  ) -> Result<ApiResponse, ApiError> {
    let request = ApiRequest {
      method,
      path: path.to_string(),
      bearer: self.bearer.borrow().clone(),
      body
    };
    debug!(
      method = method.as_str(),
      path,
      authenticated =
        request.bearer.is_some(),
      "sending api request"
    );

    let response =
      self.transport.send(request).await?;
    debug!(
      status = response.status,
      path, "api response"
    );

    if response.is_success() {
      Ok(response)
    } else {
      Err(status_error(&response))
    }
  }
}

fn encode<B: Serialize>(
  body: &B
) -> Result<serde_json::Value, ApiError>
{
  serde_json::to_value(body).map_err(
    |e| {
      ApiError::Transport(format!(
        "failed to encode request \
         body: {e}"
      ))
    }
  )
}

fn decode<R: DeserializeOwned>(
  endpoint: &str,
  response: &ApiResponse
) -> Result<R, ApiError> {
  serde_json::from_str(&response.body)
    .map_err(|e| ApiError::Malformed {
      endpoint: endpoint.to_string(),
      reason:   e.to_string()
    })
}

/// The register endpoint's payload is
/// informational; anything that isn't
/// an object with a message reads as an
/// empty confirmation.
fn parse_confirmation(
  response: &ApiResponse
) -> RegisterConfirmation {
  serde_json::from_str(&response.body)
    .unwrap_or_default()
}

/// Builds the error for a non-success
/// response, keeping the server's
/// `error` text when the body has one.
pub fn status_error(
  response: &ApiResponse
) -> ApiError {
  let message =
    serde_json::from_str::<ErrorBody>(
      &response.body
    )
    .ok()
    .and_then(|body| body.error);

  ApiError::Status {
    status: response.status,
    message
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_error_extracts_server_message()
  {
    let err = status_error(&ApiResponse {
      status: 401,
      body:   r#"{"error":"Invalid token"}"#
        .to_string()
    });
    assert_eq!(
      err.user_message(),
      "Invalid token"
    );
    assert!(err.is_unauthorized());
  }

  #[test]
  fn status_error_tolerates_non_json_bodies()
  {
    let err = status_error(&ApiResponse {
      status: 502,
      body:   "<html>Bad Gateway</html>"
        .to_string()
    });
    match err {
      | ApiError::Status {
        status,
        message
      } => {
        assert_eq!(status, 502);
        assert_eq!(message, None);
      }
      | other => {
        panic!("unexpected {other:?}")
      }
    }
  }

  #[test]
  fn confirmation_is_lenient() {
    let parsed =
      parse_confirmation(&ApiResponse {
        status: 201,
        body:   r#"{"message":"ok","id":3}"#
          .to_string()
      });
    assert_eq!(
      parsed.message.as_deref(),
      Some("ok")
    );

    let empty =
      parse_confirmation(&ApiResponse {
        status: 201,
        body:   String::new()
      });
    assert_eq!(
      empty,
      RegisterConfirmation::default()
    );
  }
}

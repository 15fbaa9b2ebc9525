use gloo::net::http::{
  Request,
  RequestBuilder
};
use gloo::storage::{
  LocalStorage,
  Storage
};
use taskdeck_core::{
  ApiError,
  ApiRequest,
  ApiResponse,
  DEFAULT_API_URL,
  KeyValueStore,
  Method,
  StorageError,
  Transport
};

/// Base URL baked in at build time.
pub fn api_base_url() -> &'static str {
  option_env!("TASKDECK_API_URL")
    .unwrap_or(DEFAULT_API_URL)
}

/// [`Transport`] over the browser
/// `fetch` API.
pub struct FetchTransport {
  base_url: String
}

impl FetchTransport {
  pub fn new(base_url: &str) -> Self {
    Self {
      base_url: base_url
        .trim_end_matches('/')
        .to_string()
    }
  }
}

impl Transport for FetchTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<ApiResponse, ApiError> {
    let url = format!(
      "{}{}",
      self.base_url, request.path
    );
    tracing::trace!(%url, method = request.method.as_str(), "fetch");

    let mut builder: RequestBuilder =
      match request.method {
        | Method::Get => Request::get(&url),
        | Method::Post => {
          Request::post(&url)
        }
        | Method::Put => Request::put(&url),
        | Method::Delete => {
          Request::delete(&url)
        }
      }
      .header(
        "Accept",
        "application/json"
      );

    if let Some(token) =
      request.bearer.as_deref()
    {
      builder = builder.header(
        "Authorization",
        &format!("Bearer {token}")
      );
    }

    let prepared = match &request.body {
      | Some(body) => {
        builder
          .header(
            "Content-Type",
            "application/json"
          )
          .body(body.to_string())
      }
      | None => builder.build()
    }
    .map_err(|e| {
      ApiError::Transport(format!(
        "failed to build request: {e}"
      ))
    })?;

    let response =
      prepared.send().await.map_err(
        |e| {
          ApiError::Transport(format!(
            "{url}: {e}"
          ))
        }
      )?;
    let status = response.status();
    let body =
      response.text().await.map_err(
        |e| {
          ApiError::Transport(format!(
            "failed reading response \
             from {url}: {e}"
          ))
        }
      )?;

    Ok(ApiResponse { status, body })
  }
}

/// `localStorage`, holding raw strings.
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    LocalStorage::raw()
      .get_item(key)
      .ok()
      .flatten()
  }

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    LocalStorage::raw()
      .set_item(key, value)
      .map_err(|e| {
        StorageError(format!(
          "set {key}: {e:?}"
        ))
      })
  }

  fn remove(
    &self,
    key: &str
  ) -> Result<(), StorageError> {
    LocalStorage::raw()
      .remove_item(key)
      .map_err(|e| {
        StorageError(format!(
          "remove {key}: {e:?}"
        ))
      })
  }
}

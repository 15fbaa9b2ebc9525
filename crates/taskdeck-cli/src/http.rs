use anyhow::Context;
use reqwest::header::{
  ACCEPT,
  CONTENT_TYPE
};
use taskdeck_core::{
  ApiError,
  ApiRequest,
  ApiResponse,
  Method,
  Transport
};
use tracing::trace;

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client:   reqwest::Client,
  base_url: String
}

impl HttpTransport {
  pub fn new(
    base_url: &str
  ) -> anyhow::Result<Self> {
    let client =
      reqwest::Client::builder()
        .user_agent(concat!(
          "taskdeck/",
          env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context(
          "failed building HTTP client"
        )?;

    Ok(Self {
      client,
      base_url: base_url
        .trim_end_matches('/')
        .to_string()
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url)
  }
}

fn method(method: Method) -> reqwest::Method {
  match method {
    | Method::Get => reqwest::Method::GET,
    | Method::Post => {
      reqwest::Method::POST
    }
    | Method::Put => reqwest::Method::PUT,
    | Method::Delete => {
      reqwest::Method::DELETE
    }
  }
}

impl Transport for HttpTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<ApiResponse, ApiError> {
    let url = self.url(&request.path);
    trace!(%url, "http request");

    let mut builder = self
      .client
      .request(method(request.method), &url)
      .header(ACCEPT, "application/json");

    if let Some(token) =
      request.bearer.as_deref()
    {
      builder = builder.bearer_auth(token);
    }
    if let Some(body) = &request.body {
      builder = builder
        .header(
          CONTENT_TYPE,
          "application/json"
        )
        .body(body.to_string());
    }

    let response =
      builder.send().await.map_err(|e| {
        ApiError::Transport(format!(
          "{url}: {e}"
        ))
      })?;
    let status = response.status().as_u16();
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

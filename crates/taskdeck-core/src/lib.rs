pub mod api;
pub mod client;
pub mod error;
pub mod forms;
pub mod notify;
pub mod state;
pub mod storage;
pub mod theme;

pub use api::{
  ApiClient,
  ApiRequest,
  ApiResponse,
  Method,
  Transport
};
pub use client::TaskdeckClient;
pub use error::{
  ApiError,
  StorageError
};
pub use forms::{
  AuthForm,
  AuthMode,
  AuthOutcome,
  TaskForm,
  TaskOutcome
};
pub use notify::{
  Notice,
  NoticeId,
  NoticeKind
};
pub use state::{
  AppState,
  Phase
};
pub use storage::{
  KeyValueStore,
  MemoryStore
};
pub use taskdeck_shared as shared;
pub use theme::Theme;

/// Base URL used when nothing else is
/// configured.
pub const DEFAULT_API_URL: &str =
  "http://localhost:3001/api";

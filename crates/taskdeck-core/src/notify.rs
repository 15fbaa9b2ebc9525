//! Single-slot user feedback.
//!
//! Only one notice is visible at a
//! time; showing a new one replaces the
//! old. Front ends schedule the
//! auto-dismiss themselves and pass the
//! notice id back, so a timer started
//! for an older notice never hides a
//! newer one.

use std::time::Duration;

use tracing::info;

/// How long a notice stays up unless
/// dismissed earlier.
pub const AUTO_DISMISS: Duration =
  Duration::from_secs(5);

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum NoticeKind {
  Success,
  Error,
  Info
}

impl NoticeKind {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Success => "success",
      | Self::Error => "error",
      | Self::Info => "info"
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      | Self::Success => "Success!",
      | Self::Error => "Error!",
      | Self::Info => "Information"
    }
  }
}

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
pub struct NoticeId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub id:      NoticeId,
  pub kind:    NoticeKind,
  pub message: String
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct Notifier {
  current: Option<Notice>,
  next_id: u64
}

impl Notifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn show(
    &mut self,
    kind: NoticeKind,
    message: impl Into<String>
  ) -> NoticeId {
    self.next_id += 1;
    let id = NoticeId(self.next_id);
    let message = message.into();
    info!(
      kind = kind.as_str(),
      %message,
      "notice"
    );
    self.current = Some(Notice {
      id,
      kind,
      message
    });
    id
  }

  pub fn current(&self) -> Option<&Notice> {
    self.current.as_ref()
  }

  /// Hides the notice with `id` if it is
  /// still the visible one.
  pub fn dismiss(
    &mut self,
    id: NoticeId
  ) -> bool {
    if self
      .current
      .as_ref()
      .is_some_and(|n| n.id == id)
    {
      self.current = None;
      true
    } else {
      false
    }
  }
}

use thiserror::Error;
use tracing::debug;
use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::ErrorKind;

/// Failures of requests made to the X server.
///
/// Only two classes exist: a request naming a window that no longer exists
/// (absorbed by the caller) and a broken connection (fatal).
#[derive(Error, Debug)]
pub enum WmError {
    #[error("X11 request failed with {kind:?} (bad value {bad_value:#x})")]
    Stale { kind: ErrorKind, bad_value: u32 },

    #[error("X11 connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 server ran out of resource ids")]
    IdsExhausted,
}

impl WmError {
    /// True when the failure only concerns a vanished window and can be
    /// absorbed without affecting the connection.
    pub fn is_stale(&self) -> bool {
        matches!(self, WmError::Stale { .. })
    }
}

impl From<ReplyError> for WmError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::ConnectionError(e) => WmError::Connection(e),
            ReplyError::X11Error(e) => WmError::Stale { kind: e.error_kind, bad_value: e.bad_value },
        }
    }
}

impl From<ReplyOrIdError> for WmError {
    fn from(err: ReplyOrIdError) -> Self {
        match err {
            ReplyOrIdError::IdsExhausted => WmError::IdsExhausted,
            ReplyOrIdError::ConnectionError(e) => WmError::Connection(e),
            ReplyOrIdError::X11Error(e) => WmError::Stale { kind: e.error_kind, bad_value: e.bad_value },
        }
    }
}

/// Log and ignore errors (for cleanup operations)
pub fn log_and_ignore<T, E: std::fmt::Display>(result: Result<T, E>, operation: &str) {
    if let Err(e) = result {
        debug!("Ignoring error in {}: {}", operation, e);
    }
}

/// Absorb a stale-window failure, passing fatal ones through.
///
/// Returns `Ok(None)` when the request failed only because its window is gone.
pub fn absorb_stale<T>(result: Result<T, WmError>, operation: &str) -> Result<Option<T>, WmError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_stale() => {
            debug!("{} skipped, window vanished: {}", operation, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

//! Execution context of a construction call

use crate::Result;
use typed_collection_common::CollectionError;

/// Where the caller is running
///
/// Collection handles can create or attach to privileged storage, so they are
/// only ever built in a trusted server context. The context is passed in by the
/// caller rather than read from process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    /// Trusted backend code
    #[default]
    Server,
    /// Untrusted client code
    Client,
}

impl ExecutionContext {
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server)
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client)
    }

    /// Fail with `ForbiddenContext` carrying `label` unless running on the server
    pub fn ensure_server(&self, label: &str) -> Result<()> {
        match self {
            Self::Server => Ok(()),
            Self::Client => Err(CollectionError::ForbiddenContext(label.to_string())),
        }
    }
}

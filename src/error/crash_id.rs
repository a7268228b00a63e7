use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier tying a caught panic in a handler to its log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct CrashId(Uuid);

impl CrashId {
    /// Generate a new UUIDv7 crash identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for CrashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Default for CrashId {
    fn default() -> Self {
        Self::new()
    }
}

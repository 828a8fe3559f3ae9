//! Observability events for sheetbase
//!
//! Every log line carries one of these as its `event` field.
//! Events are explicit and typed.

use std::fmt;

/// Observable events in sheetbase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration resolved
    ConfigLoaded,
    /// Source sheet loaded into memory
    TableLoaded,
    /// HTTP listener bound
    ServerListening,
    /// Shutdown signal received
    ShutdownStart,
    /// Server stopped
    ShutdownComplete,

    // Table mutations
    /// Description/price of a row overwritten
    RowUpdated,
    /// Row removed
    RowDeleted,
    /// Output file rewritten
    TableSaved,
    /// Output file could not be written
    SaveFailed,

    // Requests
    /// Request rejected with a client or server error
    RequestFailed,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::TableLoaded => "TABLE_LOADED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::RowUpdated => "ROW_UPDATED",
            Event::RowDeleted => "ROW_DELETED",
            Event::TableSaved => "TABLE_SAVED",
            Event::SaveFailed => "SAVE_FAILED",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_strings() {
        assert_eq!(Event::BootStart.as_str(), "BOOT_START");
        assert_eq!(Event::SaveFailed.to_string(), "SAVE_FAILED");
    }
}

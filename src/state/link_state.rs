//! Link state definitions for classifying checked links
//!
//! Every checked link ends in exactly one of these states.

use serde::Serialize;
use std::fmt;

/// Outcome classification of a single link check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// Server answered with a success status, after following redirects
    Reachable,

    /// Server answered with a 4xx or 5xx status
    Broken,

    /// The request did not finish within the per-request timeout
    TimedOut,

    /// Transport failure (DNS, connection refused, TLS, body read)
    Error,
}

impl LinkState {
    /// Returns true if this link belongs in the broken bucket
    ///
    /// Timeouts and transport errors count as broken alongside HTTP error
    /// statuses: from the reader's side of the page the link does not work.
    pub fn is_broken(&self) -> bool {
        !matches!(self, Self::Reachable)
    }

    /// Returns true if the server never produced a status code
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::TimedOut | Self::Error)
    }

    /// Label used in the Status column of the CSV report
    pub fn report_label(&self) -> &'static str {
        if self.is_broken() {
            "BROKEN"
        } else {
            "OK"
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reachable => "reachable",
            Self::Broken => "broken",
            Self::TimedOut => "timed_out",
            Self::Error => "error",
        }
    }

    /// Returns all possible link states
    pub fn all_states() -> [Self; 4] {
        [Self::Reachable, Self::Broken, Self::TimedOut, Self::Error]
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

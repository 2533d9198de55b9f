use crate::crawler::FetchOutcome;
use crate::state::LinkState;
use serde::Serialize;

/// Outcome of checking one unique URL
///
/// Created once, the first time the URL is checked, and never modified
/// afterwards. `parent` is the page the link was first discovered on and is
/// `None` for seed URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub url: String,
    pub parent: Option<String>,
    pub state: LinkState,
    pub http_status: Option<u16>,
    pub depth: u32,

    /// Transport failure description for `TimedOut`/`Error` links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LinkRecord {
    /// Builds the record for a finished check
    pub fn from_outcome(
        url: impl Into<String>,
        parent: Option<String>,
        depth: u32,
        outcome: &FetchOutcome,
    ) -> Self {
        let (state, http_status, detail) = match outcome {
            FetchOutcome::Reachable { status_code, .. } => {
                (LinkState::Reachable, Some(*status_code), None)
            }
            FetchOutcome::Broken { status_code } => (LinkState::Broken, Some(*status_code), None),
            FetchOutcome::TimedOut => (
                LinkState::TimedOut,
                None,
                Some("Request timed out".to_string()),
            ),
            FetchOutcome::Error { detail } => (LinkState::Error, None, Some(detail.clone())),
        };

        Self {
            url: url.into(),
            parent,
            state,
            http_status,
            depth,
            detail,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.state.is_broken()
    }

    pub fn is_seed(&self) -> bool {
        self.parent.is_none()
    }
}

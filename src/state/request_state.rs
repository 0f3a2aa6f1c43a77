/// Request state definitions for tracking a page-weight computation
///
/// A request moves strictly forward through these phases and ends in either
/// `Done` or `Failed`.
use crate::PageWeightError;
use std::fmt;
use std::time::{Duration, Instant};

/// Represents the current phase of a page-weight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    // ===== Active States =====
    /// Request accepted, nothing done yet
    Start,

    /// Normalizing the input into an absolute URL
    ResolvingUrl,

    /// Fetching the main HTML document
    FetchingDocument,

    /// Parsing the document for resource references
    Extracting,

    /// Fetching stylesheets to discover CSS-declared images
    FetchingCss,

    /// Fetching all remaining sub-resources
    FetchingResources,

    /// Combining sizes into the report
    Aggregating,

    // ===== Terminal States =====
    /// A report was produced
    Done,

    /// The request was aborted by a fatal error
    Failed,
}

impl RequestState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if the request may move from this state to `next`
    ///
    /// Every active state may fail. `FetchingCss` is skipped when the page
    /// has no stylesheets.
    pub fn can_transition_to(&self, next: RequestState) -> bool {
        if next == Self::Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Self::Start, Self::ResolvingUrl)
                | (Self::ResolvingUrl, Self::FetchingDocument)
                | (Self::FetchingDocument, Self::Extracting)
                | (Self::Extracting, Self::FetchingCss)
                | (Self::Extracting, Self::FetchingResources)
                | (Self::FetchingCss, Self::FetchingResources)
                | (Self::FetchingResources, Self::Aggregating)
                | (Self::Aggregating, Self::Done)
        )
    }

    /// Returns the string used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ResolvingUrl => "resolving_url",
            Self::FetchingDocument => "fetching_document",
            Self::Extracting => "extracting",
            Self::FetchingCss => "fetching_css",
            Self::FetchingResources => "fetching_resources",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the state of one request and the time spent in it
#[derive(Debug)]
pub struct RequestTracker {
    state: RequestState,
    started_at: Instant,
}

impl RequestTracker {
    /// Creates a tracker in the `Start` state
    pub fn new() -> Self {
        Self {
            state: RequestState::Start,
            started_at: Instant::now(),
        }
    }

    /// Returns the current state
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Time elapsed since the request started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn advance(&mut self, next: RequestState) -> Result<(), PageWeightError> {
        if !self.state.can_transition_to(next) {
            return Err(PageWeightError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("Request state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Marks the request as failed; a no-op once terminal
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            tracing::trace!("Request state {} -> {}", self.state, RequestState::Failed);
            self.state = RequestState::Failed;
        }
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

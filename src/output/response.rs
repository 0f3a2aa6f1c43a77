//! Wire shapes returned to callers
//!
//! A request yields either a [`PageWeightReport`] or an [`ErrorResponse`].
//! The routing layer (CLI or a server wrapper) picks the transport status
//! from [`PageWeightResponse::http_status`].

use crate::output::PageWeightReport;
use crate::{ErrorKind, PageWeightError};
use serde::Serialize;

/// Error payload: `{ "error": "<message>", "kind": "<category>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&PageWeightError> for ErrorResponse {
    fn from(error: &PageWeightError) -> Self {
        Self {
            error: error.to_string(),
            kind: error.kind(),
        }
    }
}

/// Outcome of one page weight request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageWeightResponse {
    Report(PageWeightReport),
    Error(ErrorResponse),
}

impl PageWeightResponse {
    /// Transport status code for this response
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Report(_) => 200,
            Self::Error(e) => e.kind.http_status(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Report(_))
    }

    /// Serializes the response as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Result<PageWeightReport, PageWeightError>> for PageWeightResponse {
    fn from(result: Result<PageWeightReport, PageWeightError>) -> Self {
        match result {
            Ok(report) => Self::Report(report),
            Err(e) => Self::Error(ErrorResponse::from(&e)),
        }
    }
}

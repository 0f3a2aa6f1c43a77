//! Output module for page weight results
//!
//! This module handles:
//! - Aggregating fetched sizes into a [`PageWeightReport`]
//! - The JSON success and error shapes returned to callers
//! - Plain-text rendering for the command line

mod report;
mod response;
mod text;

pub use report::{
    aggregate, bytes_to_mb, ByteTotals, PageWeightReport, ResourceBreakdown, ResourceEntry,
    BYTES_PER_MB,
};
pub use response::{ErrorResponse, PageWeightResponse};
pub use text::{format_report, print_report};

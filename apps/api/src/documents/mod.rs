//! Export payloads and their translation into content blocks.
//!
//! `POST /export` accepts either a CV or an analysis report. The presence of an
//! `analysisData` key selects the report; anything else is read as a CV.

pub mod analysis;
pub mod cv;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::layout::{ContentBlock, PageGeometry};

pub use analysis::AnalysisRequest;
pub use cv::CvPayload;

/// The payload was readable JSON but not a valid export request.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("{0}")]
    Shape(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug)]
pub enum ExportRequest {
    Cv(CvPayload),
    Analysis(AnalysisRequest),
}

impl ExportRequest {
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        if !value.is_object() {
            return Err(PayloadError::Invalid(
                "request body must be a JSON object".to_string(),
            ));
        }
        if value.get("analysisData").is_some() {
            let request: AnalysisRequest = serde_json::from_value(value)?;
            request.validate()?;
            Ok(ExportRequest::Analysis(request))
        } else {
            let payload: CvPayload = serde_json::from_value(value)?;
            Ok(ExportRequest::Cv(payload))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExportRequest::Cv(_) => "cv",
            ExportRequest::Analysis(_) => "analysis",
        }
    }
}

/// Everything the renderer needs for one export.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub title: String,
    pub filename: String,
    pub geometry: PageGeometry,
    pub blocks: Vec<ContentBlock>,
}

/// Collapses whitespace runs to `_` and drops characters that are unsafe in a
/// `Content-Disposition` filename.
pub fn filename_slug(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn filename_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// Joins the non-empty parts with `separator`.
pub(crate) fn join_present<'a>(parts: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

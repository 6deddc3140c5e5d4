//! CV analysis report: overall score, per-section score bars, strengths,
//! improvement areas, keyword coverage and recommendations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::documents::{filename_slug, filename_timestamp, PayloadError, PreparedDocument};
use crate::layout::block::ScoreTone;
use crate::layout::{ContentBlock, PageGeometry, Rgb, TextStyle, Theme};

const STRENGTH_COLOR: Rgb = Rgb(34, 197, 94);
const STRENGTH_FILL: Rgb = Rgb(240, 253, 244);
const IMPROVEMENT_COLOR: Rgb = Rgb(251, 191, 36);
const IMPROVEMENT_FILL: Rgb = Rgb(254, 252, 232);
const RECOMMENDATION_COLOR: Rgb = Rgb(59, 130, 246);
const RECOMMENDATION_FILL: Rgb = Rgb(239, 246, 255);
const MISSING_COLOR: Rgb = Rgb(239, 68, 68);
const DATE_COLOR: Rgb = Rgb(100, 100, 100);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub analysis_data: Option<AnalysisData>,
    /// Used in the download filename when present.
    #[serde(default)]
    pub subject_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub overall_score: f32,
    #[serde(default)]
    pub scores: Vec<SectionScore>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
    #[serde(default)]
    pub keywords: Option<KeywordCoverage>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionScore {
    pub category: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    pub area: String,
    #[serde(default)]
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordCoverage {
    #[serde(default)]
    pub matched: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

fn check_score(what: &str, score: f32) -> Result<(), PayloadError> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(PayloadError::Invalid(format!(
            "{what} must be between 0 and 100 (got {score})"
        )))
    }
}

impl AnalysisRequest {
    /// Rejects a missing report and out-of-range scores.
    pub fn validate(&self) -> Result<&AnalysisData, PayloadError> {
        let data = self
            .analysis_data
            .as_ref()
            .ok_or_else(|| PayloadError::Invalid("Missing analysis data".to_string()))?;
        check_score("overallScore", data.overall_score)?;
        for section in &data.scores {
            check_score(&format!("score for '{}'", section.category), section.score)?;
        }
        Ok(data)
    }

    /// Builds the report. Call `validate` first; a missing report yields an error here too.
    pub fn prepare(
        &self,
        geometry: PageGeometry,
        theme: &Theme,
        now: DateTime<Utc>,
    ) -> Result<PreparedDocument, PayloadError> {
        let data = self.validate()?;
        let slug = self
            .subject_name
            .as_deref()
            .map(filename_slug)
            .unwrap_or_default();
        let filename = if slug.is_empty() {
            format!("cv-analysis-report-{}.pdf", filename_timestamp(now))
        } else {
            format!("cv-analysis-report-{slug}-{}.pdf", filename_timestamp(now))
        };

        Ok(PreparedDocument {
            title: "CV Analysis Report".to_string(),
            filename,
            geometry,
            blocks: report_blocks(data, theme, now),
        })
    }
}

/// Lays out the report sections in their fixed order; empty sections are omitted.
pub fn report_blocks(data: &AnalysisData, theme: &Theme, now: DateTime<Utc>) -> Vec<ContentBlock> {
    let mut blocks = vec![
        ContentBlock::heading("CV ANALYSIS REPORT", TextStyle::bold(24.0)),
        ContentBlock::Spacer(5.0),
        ContentBlock::Card {
            text: format!("Overall Score: {}/100", data.overall_score),
            style: TextStyle::bold(18.0)
                .with_color(theme.tone_color(ScoreTone::for_score(data.overall_score))),
            fill: None,
        },
        ContentBlock::paragraph(
            format!("Generated: {}", now.format("%B %-d, %Y")),
            TextStyle::normal(10.0).with_color(DATE_COLOR),
        ),
        ContentBlock::Spacer(7.0),
    ];

    if !data.scores.is_empty() {
        blocks.push(ContentBlock::heading("Section Scores", TextStyle::bold(16.0)));
        blocks.extend(data.scores.iter().map(|s| ContentBlock::ScoreBar {
            label: s.category.clone(),
            score: s.score,
        }));
        blocks.push(ContentBlock::Spacer(5.0));
    }

    if !data.strengths.is_empty() {
        blocks.push(ContentBlock::heading(
            "Strengths",
            TextStyle::bold(14.0).with_color(STRENGTH_COLOR),
        ));
        blocks.extend(data.strengths.iter().map(|s| ContentBlock::BulletItem {
            text: s.clone(),
            marker: None,
            fill: Some(STRENGTH_FILL),
        }));
        blocks.push(ContentBlock::Spacer(5.0));
    }

    if !data.improvements.is_empty() {
        blocks.push(ContentBlock::heading(
            "Areas for Improvement",
            TextStyle::bold(14.0).with_color(IMPROVEMENT_COLOR),
        ));
        blocks.extend(data.improvements.iter().map(|i| ContentBlock::KeyValueRow {
            key: i.area.clone(),
            value: i.suggestion.clone(),
            fill: Some(IMPROVEMENT_FILL),
        }));
        blocks.push(ContentBlock::Spacer(5.0));
    }

    if let Some(keywords) = &data.keywords {
        blocks.push(ContentBlock::heading("Keywords Analysis", TextStyle::bold(14.0)));
        if !keywords.matched.is_empty() {
            blocks.push(ContentBlock::heading(
                "Matched Keywords:",
                TextStyle::bold(11.0).with_color(STRENGTH_COLOR),
            ));
            blocks.push(ContentBlock::paragraph(
                keywords.matched.join(", "),
                TextStyle::normal(9.0),
            ));
        }
        if !keywords.missing.is_empty() {
            blocks.push(ContentBlock::heading(
                "Missing Keywords:",
                TextStyle::bold(11.0).with_color(MISSING_COLOR),
            ));
            blocks.push(ContentBlock::paragraph(
                keywords.missing.join(", "),
                TextStyle::normal(9.0),
            ));
        }
        blocks.push(ContentBlock::Spacer(5.0));
    }

    if !data.recommendations.is_empty() {
        blocks.push(ContentBlock::heading(
            "Recommendations",
            TextStyle::bold(14.0).with_color(RECOMMENDATION_COLOR),
        ));
        blocks.extend(
            data.recommendations
                .iter()
                .enumerate()
                .map(|(i, rec)| ContentBlock::BulletItem {
                    text: rec.clone(),
                    marker: Some(format!("{}.", i + 1)),
                    fill: Some(RECOMMENDATION_FILL),
                }),
        );
    }

    blocks
}

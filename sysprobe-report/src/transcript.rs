//! Transcript Data Model
//!
//! An ordered, append-only sequence of result lines for a single run.
//! Every stage contributes exactly one *primary* line whether it
//! succeeded, failed, or was skipped; detail such as per-sensor presence
//! or baseline ratios rides along as *supplemental* lines. The transcript
//! becomes effectively immutable once the runner hands it back by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a line within the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Run header (timestamp line). Not counted against the stage total.
    Header,
    /// The single line a stage contributes.
    Primary,
    /// Extra detail attached to a stage or appended after the run.
    Supplemental,
}

/// One result line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultLine {
    /// Rendered text.
    pub text: String,
    /// Role of this line.
    pub kind: LineKind,
}

/// Ordered result lines for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    lines: Vec<ResultLine>,
    started_at: Option<DateTime<Utc>>,
}

impl Transcript {
    /// Empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the run start and push the header line.
    pub fn begin(&mut self, text: impl Into<String>) {
        self.started_at = Some(Utc::now());
        self.push(text, LineKind::Header);
    }

    /// Append a stage's primary line.
    pub fn push_primary(&mut self, text: impl Into<String>) {
        self.push(text, LineKind::Primary);
    }

    /// Append a supplemental line.
    pub fn push_supplemental(&mut self, text: impl Into<String>) {
        self.push(text, LineKind::Supplemental);
    }

    fn push(&mut self, text: impl Into<String>, kind: LineKind) {
        self.lines.push(ResultLine {
            text: text.into(),
            kind,
        });
    }

    /// All lines in append order.
    pub fn lines(&self) -> &[ResultLine] {
        &self.lines
    }

    /// Line texts in append order.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Number of primary lines, i.e. stages attempted.
    pub fn primary_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Primary)
            .count()
    }

    /// Total line count.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the transcript holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// UTC instant the run began, if `begin` was called.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}

//! Core data model for Milestone Lookup.

/// A single developmental milestone reference entry.
///
/// Records are loaded once from reference data and never mutated. The
/// `code` identifies exactly one record; `(domain, level)` may be shared
/// by any number of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneRecord {
    /// Skill code, e.g. `MAN-1`.
    pub code: String,
    /// Progression stage within the domain.
    pub level: i64,
    /// Category grouping related milestones, e.g. `Mand`.
    pub domain: String,
    /// Human-readable milestone description.
    pub milestone: String,
}

impl MilestoneRecord {
    pub fn new(
        code: impl Into<String>,
        level: i64,
        domain: impl Into<String>,
        milestone: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            level,
            domain: domain.into(),
            milestone: milestone.into(),
        }
    }
}

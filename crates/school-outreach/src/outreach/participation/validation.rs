use super::domain::{
    ContactId, ParticipationId, ParticipationRecord, ProgramId, SchoolId, SchoolYear,
    SchoolYearError, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub const MAX_STUDENT_COUNT: u32 = 10_000;
pub const MAX_NOTES_LEN: usize = 2_000;
const SYSTEM_USER: &str = "system";

/// Errors raised while turning a loose draft into a participation record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParticipationValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error(transparent)]
    SchoolYear(#[from] SchoolYearError),
    #[error("student count {found} is outside 0..={max}")]
    StudentCount { found: i64, max: u32 },
    #[error("notes exceed {max} characters ({found})")]
    NotesTooLong { found: usize, max: usize },
}

/// Participation as captured by a form or an import row, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub school_year: Option<String>,
    #[serde(default)]
    pub coordinator_id: Option<String>,
    #[serde(default)]
    pub student_count: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub report_submitted: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Limits applied to participation drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub max_student_count: u32,
    pub max_notes_len: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_student_count: MAX_STUDENT_COUNT,
            max_notes_len: MAX_NOTES_LEN,
        }
    }
}

/// Boundary check producing fully-populated [`ParticipationRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct ParticipationValidator {
    policy: ValidationPolicy,
}

static PARTICIPATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_participation_id() -> ParticipationId {
    let id = PARTICIPATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ParticipationId(format!("participation-{id:06}"))
}

fn required(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ParticipationValidationError> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .ok_or(ParticipationValidationError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

impl ParticipationValidator {
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn validate(
        &self,
        draft: ParticipationDraft,
    ) -> Result<ParticipationRecord, ParticipationValidationError> {
        let school_id = SchoolId(required(draft.school_id, "school_id")?);
        let program_id = ProgramId(required(draft.program_id, "program_id")?);
        let school_year: SchoolYear = required(draft.school_year, "school_year")?.parse()?;
        let coordinator_id = ContactId(required(draft.coordinator_id, "coordinator_id")?);

        let raw_count = draft
            .student_count
            .ok_or(ParticipationValidationError::MissingField("student_count"))?;
        let student_count = u32::try_from(raw_count)
            .ok()
            .filter(|count| *count <= self.policy.max_student_count)
            .ok_or(ParticipationValidationError::StudentCount {
                found: raw_count,
                max: self.policy.max_student_count,
            })?;

        let notes = draft.notes.unwrap_or_default().trim().to_string();
        let notes_len = notes.chars().count();
        if notes_len > self.policy.max_notes_len {
            return Err(ParticipationValidationError::NotesTooLong {
                found: notes_len,
                max: self.policy.max_notes_len,
            });
        }

        let id = optional(draft.id)
            .map(ParticipationId)
            .unwrap_or_else(next_participation_id);
        let created_by = optional(draft.created_by)
            .map(UserId)
            .unwrap_or_else(|| UserId::from(SYSTEM_USER));

        Ok(ParticipationRecord {
            id,
            school_id,
            program_id,
            school_year,
            coordinator_id,
            student_count,
            notes,
            report_submitted: draft.report_submitted.unwrap_or(false),
            created_at: draft.created_at.unwrap_or_else(Utc::now),
            created_by,
        })
    }
}

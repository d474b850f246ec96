use super::domain::{ParticipationRecord, ProgramId, SchoolYear, SchoolYearError};
use super::report::SchoolParticipationInfo;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    #[error(transparent)]
    SchoolYear(#[from] SchoolYearError),
    #[error("unknown participation status '{0}' (expected all, participating or notParticipating)")]
    Status(String),
}

/// School-year selector; `all` disables the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum YearFilter {
    #[default]
    All,
    Year(SchoolYear),
}

impl YearFilter {
    pub fn matches(&self, record: &ParticipationRecord) -> bool {
        match self {
            Self::All => true,
            Self::Year(year) => record.school_year == *year,
        }
    }
}

impl FromStr for YearFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        Ok(Self::Year(trimmed.parse()?))
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

impl TryFrom<String> for YearFilter {
    type Error = FilterParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Program selector; `all` disables the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ProgramFilter {
    #[default]
    All,
    Program(ProgramId),
}

impl ProgramFilter {
    pub fn matches(&self, record: &ParticipationRecord) -> bool {
        match self {
            Self::All => true,
            Self::Program(id) => &record.program_id == id,
        }
    }
}

impl From<&str> for ProgramFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Program(ProgramId::from(trimmed))
        }
    }
}

impl From<String> for ProgramFilter {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Participation status selector over per-school summaries.
///
/// `Participating` and `NotParticipating` overlap: a school running some but
/// not all of its eligible programs satisfies both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Participating,
    NotParticipating,
}

impl StatusFilter {
    pub fn matches(&self, info: &SchoolParticipationInfo) -> bool {
        match self {
            Self::All => true,
            Self::Participating => !info.participating.is_empty(),
            Self::NotParticipating => !info.not_participating.is_empty(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "" | ALL => Ok(Self::All),
            "participating" => Ok(Self::Participating),
            "notparticipating" => Ok(Self::NotParticipating),
            _ => Err(FilterParseError::Status(value.trim().to_string())),
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = FilterParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

pub fn filter_by_school_year<'a, I>(records: I, year: &YearFilter) -> Vec<&'a ParticipationRecord>
where
    I: IntoIterator<Item = &'a ParticipationRecord>,
{
    records
        .into_iter()
        .filter(|record| year.matches(record))
        .collect()
}

pub fn filter_by_program<'a, I>(records: I, program: &ProgramFilter) -> Vec<&'a ParticipationRecord>
where
    I: IntoIterator<Item = &'a ParticipationRecord>,
{
    records
        .into_iter()
        .filter(|record| program.matches(record))
        .collect()
}

pub fn filter_schools_by_status<'a, I>(
    infos: I,
    status: StatusFilter,
) -> Vec<&'a SchoolParticipationInfo>
where
    I: IntoIterator<Item = &'a SchoolParticipationInfo>,
{
    infos.into_iter().filter(|info| status.matches(info)).collect()
}

/// Exact school-name match; `None` keeps everything.
pub fn filter_schools_by_name<'a, I>(
    infos: I,
    name: Option<&str>,
) -> Vec<&'a SchoolParticipationInfo>
where
    I: IntoIterator<Item = &'a SchoolParticipationInfo>,
{
    infos
        .into_iter()
        .filter(|info| name.map_or(true, |name| info.school_name == name))
        .collect()
}

/// Schools for which the program is eligible, participating or not.
pub fn filter_schools_by_program<'a, I>(
    infos: I,
    program_id: Option<&ProgramId>,
) -> Vec<&'a SchoolParticipationInfo>
where
    I: IntoIterator<Item = &'a SchoolParticipationInfo>,
{
    infos
        .into_iter()
        .filter(|info| program_id.map_or(true, |id| info.covers(id)))
        .collect()
}

/// Distinct school years present in the records, newest first.
pub fn available_school_years<'a, I>(records: I) -> Vec<SchoolYear>
where
    I: IntoIterator<Item = &'a ParticipationRecord>,
{
    let years: BTreeSet<SchoolYear> = records.into_iter().map(|record| record.school_year).collect();
    years.into_iter().rev().collect()
}

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Defines a string-backed identifier newtype. A blank value counts as a missing key.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a school in the outreach registry.
    SchoolId
);
string_id!(
    /// Identifier of a program in the catalog.
    ProgramId
);
string_id!(
    /// Identifier of a coordinator contact.
    ContactId
);
string_id!(ParticipationId);
string_id!(
    /// Owner of a record (the account that entered it).
    UserId
);

/// School-type tag such as `primary` or `lyceum`, normalised for comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SchoolType(String);

impl SchoolType {
    pub fn new(value: &str) -> Self {
        let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
        Self(cleaned.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SchoolType {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for SchoolType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<SchoolType> for String {
    fn from(value: SchoolType) -> Self {
        value.0
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds a tag set from loose strings, dropping blanks.
pub fn school_types<I, S>(values: I) -> BTreeSet<SchoolType>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| SchoolType::new(value.as_ref()))
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// True when the two tag sets share at least one school type.
pub fn types_intersect(left: &BTreeSet<SchoolType>, right: &BTreeSet<SchoolType>) -> bool {
    let (small, large) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    small.iter().any(|tag| large.contains(tag))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchoolYearError {
    #[error("school year '{0}' must look like YYYY/YYYY")]
    Format(String),
    #[error("school year '{0}' must span two consecutive years")]
    NotConsecutive(String),
}

/// Academic year token rendered as `YYYY/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolYear {
    start: i32,
}

impl SchoolYear {
    /// Month in which a new academic year begins.
    pub const FIRST_MONTH: u32 = 9;

    pub fn starting(start: i32) -> Self {
        Self { start }
    }

    /// Academic year that contains the given calendar date.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= Self::FIRST_MONTH {
            Self::starting(date.year())
        } else {
            Self::starting(date.year() - 1)
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start
    }

    pub fn end_year(&self) -> i32 {
        self.start + 1
    }

    pub fn previous(&self) -> Self {
        Self::starting(self.start - 1)
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end_year())
    }
}

impl FromStr for SchoolYear {
    type Err = SchoolYearError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let format_error = || SchoolYearError::Format(trimmed.to_string());

        let (first, second) = trimmed.split_once('/').ok_or_else(format_error)?;
        if first.len() != 4 || second.len() != 4 {
            return Err(format_error());
        }
        if !first.chars().chain(second.chars()).all(|c| c.is_ascii_digit()) {
            return Err(format_error());
        }

        let start: i32 = first.parse().map_err(|_| format_error())?;
        let end: i32 = second.parse().map_err(|_| format_error())?;
        if end != start + 1 {
            return Err(SchoolYearError::NotConsecutive(trimmed.to_string()));
        }

        Ok(Self::starting(start))
    }
}

impl TryFrom<String> for SchoolYear {
    type Error = SchoolYearError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchoolYear> for String {
    fn from(value: SchoolYear) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    #[default]
    Program,
    Project,
    Campaign,
    Other,
}

impl ProgramType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::Project => "Project",
            Self::Campaign => "Campaign",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    #[serde(default)]
    pub school_types: BTreeSet<SchoolType>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
}

impl School {
    /// Bare school with only the fields the statistics engine needs.
    pub fn new<I, S>(id: &str, name: &str, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: SchoolId::from(id),
            name: name.to_string(),
            school_types: school_types(types),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub school_types: BTreeSet<SchoolType>,
    #[serde(default)]
    pub program_type: ProgramType,
}

impl Program {
    pub fn new<I, S>(id: &str, name: &str, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: ProgramId::from(id),
            name: name.to_string(),
            code: None,
            description: String::new(),
            school_types: school_types(types),
            program_type: ProgramType::Program,
        }
    }

    pub fn applies_to(&self, school: &School) -> bool {
        types_intersect(&self.school_types, &school.school_types)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Fact that a school ran a program during one school year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub id: ParticipationId,
    pub school_id: SchoolId,
    pub program_id: ProgramId,
    pub school_year: SchoolYear,
    pub coordinator_id: ContactId,
    pub student_count: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub report_submitted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_year_parses_consecutive_years() {
        let year: SchoolYear = "2024/2025".parse().expect("valid year");
        assert_eq!(year.start_year(), 2024);
        assert_eq!(year.end_year(), 2025);
        assert_eq!(year.to_string(), "2024/2025");
    }

    #[test]
    fn school_year_rejects_malformed_tokens() {
        assert!(matches!(
            "2024-2025".parse::<SchoolYear>(),
            Err(SchoolYearError::Format(_))
        ));
        assert!(matches!(
            "24/25".parse::<SchoolYear>(),
            Err(SchoolYearError::Format(_))
        ));
        assert!(matches!(
            "2024/2026".parse::<SchoolYear>(),
            Err(SchoolYearError::NotConsecutive(_))
        ));
    }

    #[test]
    fn school_year_starts_in_september() {
        let august = NaiveDate::from_ymd_opt(2025, 8, 31).expect("valid date");
        let september = NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date");
        assert_eq!(SchoolYear::containing(august).to_string(), "2024/2025");
        assert_eq!(SchoolYear::containing(september).to_string(), "2025/2026");
    }

    #[test]
    fn school_year_round_trips_through_json_as_string() {
        let year = SchoolYear::starting(2023);
        let json = serde_json::to_string(&year).expect("serialize");
        assert_eq!(json, "\"2023/2024\"");
        assert!(serde_json::from_str::<SchoolYear>("\"2023/2025\"").is_err());
    }

    #[test]
    fn school_types_are_normalised() {
        let tags = school_types(["\u{feff} Primary ", "LYCEUM", "  "]);
        let rendered: Vec<&str> = tags.iter().map(SchoolType::as_str).collect();
        assert_eq!(rendered, vec!["lyceum", "primary"]);
    }

    #[test]
    fn program_applies_when_any_type_is_shared() {
        let school = School::new("s1", "SP 1", ["primary"]);
        let shared = Program::new("p1", "Reading", ["primary", "lyceum"]);
        let disjoint = Program::new("p2", "Careers", ["lyceum"]);
        assert!(shared.applies_to(&school));
        assert!(!disjoint.applies_to(&school));
    }

    #[test]
    fn blank_ids_count_as_missing() {
        assert!(SchoolId::from("  ").is_blank());
        assert!(!ProgramId::from("p1").is_blank());
    }
}

use super::normalizer::{clean_text, parse_flag, split_school_types};
use crate::outreach::participation::domain::{school_types, Contact, ContactId, School, SchoolId};
use crate::outreach::participation::validation::ParticipationDraft;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One CSV data row together with its 1-based line number in the file.
#[derive(Debug)]
pub(crate) struct Row<T> {
    pub(crate) line: u64,
    pub(crate) value: T,
}

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn rows<R, T>(reader: R) -> Result<Vec<Row<T>>, csv::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = reader_for(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();
        let value = record.deserialize(Some(&headers))?;
        rows.push(Row { line, value });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchoolRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    school_types: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    postal_code: Option<String>,
}

impl SchoolRow {
    /// `None` when the row has no usable id.
    pub(crate) fn into_school(self) -> Option<School> {
        let id = self.id.map(|raw| clean_text(&raw)).filter(|id| !id.is_empty())?;
        let tags = self
            .school_types
            .as_deref()
            .map(split_school_types)
            .unwrap_or_default();

        Some(School {
            id: SchoolId(id),
            name: text(self.name),
            school_types: school_types(tags),
            email: text(self.email),
            phone: text(self.phone),
            address: text(self.address),
            city: text(self.city),
            postal_code: text(self.postal_code),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
}

impl ContactRow {
    pub(crate) fn into_contact(self) -> Option<Contact> {
        let id = self.id.map(|raw| clean_text(&raw)).filter(|id| !id.is_empty())?;
        Some(Contact {
            id: ContactId(id),
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            email: text(self.email),
            phone: text(self.phone),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParticipationRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    school_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    program_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    school_year: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    coordinator_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    student_count: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    report_submitted: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_by: Option<String>,
}

impl ParticipationRow {
    /// Converts the raw cells into a draft. Cell-level parse failures are
    /// returned as a reason string.
    pub(crate) fn into_draft(self) -> Result<ParticipationDraft, String> {
        let student_count = match self.student_count.as_deref() {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| format!("student_count '{raw}' is not a whole number"))?,
            ),
            None => None,
        };
        let report_submitted = match self.report_submitted.as_deref() {
            Some(raw) => Some(
                parse_flag(raw).ok_or_else(|| format!("report_submitted '{raw}' is not yes/no"))?,
            ),
            None => None,
        };
        let created_at = match self.created_at.as_deref() {
            Some(raw) => Some(
                parse_timestamp(raw).ok_or_else(|| format!("created_at '{raw}' is not a date"))?,
            ),
            None => None,
        };

        Ok(ParticipationDraft {
            id: self.id,
            school_id: self.school_id,
            program_id: self.program_id,
            school_year: self.school_year,
            coordinator_id: self.coordinator_id,
            student_count,
            notes: self.notes,
            report_submitted,
            created_at,
            created_by: self.created_by,
        })
    }
}

pub(crate) fn parse_schools<R: Read>(reader: R) -> Result<Vec<Row<SchoolRow>>, csv::Error> {
    rows(reader)
}

pub(crate) fn parse_contacts<R: Read>(reader: R) -> Result<Vec<Row<ContactRow>>, csv::Error> {
    rows(reader)
}

pub(crate) fn parse_participations<R: Read>(
    reader: R,
) -> Result<Vec<Row<ParticipationRow>>, csv::Error> {
    rows(reader)
}

fn text(value: Option<String>) -> String {
    value.as_deref().map(clean_text).unwrap_or_default()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| Utc.from_local_datetime(&naive).single());
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_timestamp_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value)
}

use super::domain::{Contact, ContactId, ParticipationRecord, Program, ProgramId, School, SchoolId};
use std::collections::HashMap;

/// Rendering of the report flag as shown in record listings.
pub const fn report_submitted_label(submitted: bool) -> &'static str {
    if submitted {
        "Tak"
    } else {
        "Nie"
    }
}

/// Free-text search over participation records and the entities they point at.
///
/// Matching is a case-insensitive substring test against the school
/// (name, email, address, city), the program (name, description), the
/// coordinator (first name, last name, email, phone), the school year, the
/// student count, the notes and the report flag label. A blank query keeps
/// every record. Dangling references match as empty strings.
pub fn search_participations<'a, I>(
    records: I,
    schools: &HashMap<SchoolId, School>,
    contacts: &HashMap<ContactId, Contact>,
    programs: &HashMap<ProgramId, Program>,
    query: &str,
) -> Vec<&'a ParticipationRecord>
where
    I: IntoIterator<Item = &'a ParticipationRecord>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|record| {
            searchable_fields(record, schools, contacts, programs)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

fn searchable_fields(
    record: &ParticipationRecord,
    schools: &HashMap<SchoolId, School>,
    contacts: &HashMap<ContactId, Contact>,
    programs: &HashMap<ProgramId, Program>,
) -> Vec<String> {
    let school = schools.get(&record.school_id);
    let program = programs.get(&record.program_id);
    let coordinator = contacts.get(&record.coordinator_id);

    let mut fields = Vec::with_capacity(14);
    fields.extend(
        [
            school.map(|s| s.name.as_str()),
            school.map(|s| s.email.as_str()),
            school.map(|s| s.address.as_str()),
            school.map(|s| s.city.as_str()),
            program.map(|p| p.name.as_str()),
            program.map(|p| p.description.as_str()),
            coordinator.map(|c| c.first_name.as_str()),
            coordinator.map(|c| c.last_name.as_str()),
            coordinator.map(|c| c.email.as_str()),
            coordinator.map(|c| c.phone.as_str()),
        ]
        .into_iter()
        .map(|field| field.unwrap_or_default().to_string()),
    );
    fields.push(record.school_year.to_string());
    fields.push(record.student_count.to_string());
    fields.push(record.notes.clone());
    fields.push(report_submitted_label(record.report_submitted).to_string());
    fields
}

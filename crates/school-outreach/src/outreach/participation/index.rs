use super::domain::{ParticipationRecord, ProgramId, SchoolId};
use std::collections::HashMap;
use tracing::warn;

/// Lookup from school to the programs it has participation records for.
///
/// Program ids are kept once per record, so a program run in several school
/// years appears several times. Use [`ParticipationIndex::participates`] for
/// membership questions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParticipationIndex {
    by_school: HashMap<SchoolId, Vec<ProgramId>>,
    skipped: usize,
}

impl ParticipationIndex {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ParticipationRecord>,
    {
        let mut index = Self::default();

        for record in records {
            if record.school_id.is_blank() || record.program_id.is_blank() {
                warn!(
                    participation_id = %record.id,
                    school_id = %record.school_id,
                    program_id = %record.program_id,
                    "skipping participation record without school or program id"
                );
                index.skipped += 1;
                continue;
            }

            index
                .by_school
                .entry(record.school_id.clone())
                .or_default()
                .push(record.program_id.clone());
        }

        index
    }

    /// Raw program list for a school, duplicates included.
    pub fn programs_for(&self, school_id: &SchoolId) -> &[ProgramId] {
        self.by_school
            .get(school_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn participates(&self, school_id: &SchoolId, program_id: &ProgramId) -> bool {
        self.programs_for(school_id).contains(program_id)
    }

    pub fn school_count(&self) -> usize {
        self.by_school.len()
    }

    /// Number of records dropped for a missing key.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SchoolId, &[ProgramId])> {
        self.by_school
            .iter()
            .map(|(school, programs)| (school, programs.as_slice()))
    }
}

/// Builds the school-to-programs index from a flat list of records.
pub fn create_school_participations_map<'a, I>(records: I) -> ParticipationIndex
where
    I: IntoIterator<Item = &'a ParticipationRecord>,
{
    ParticipationIndex::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outreach::participation::tests::common::participation;

    #[test]
    fn groups_program_ids_by_school_and_keeps_duplicates() {
        let records = vec![
            participation("r1", "s1", "p1", "2023/2024"),
            participation("r2", "s1", "p1", "2024/2025"),
            participation("r3", "s1", "p2", "2024/2025"),
            participation("r4", "s2", "p2", "2024/2025"),
        ];

        let index = ParticipationIndex::from_records(&records);

        assert_eq!(index.school_count(), 2);
        assert_eq!(
            index.programs_for(&SchoolId::from("s1")),
            &[
                ProgramId::from("p1"),
                ProgramId::from("p1"),
                ProgramId::from("p2")
            ]
        );
        assert!(index.participates(&SchoolId::from("s2"), &ProgramId::from("p2")));
        assert!(!index.participates(&SchoolId::from("s2"), &ProgramId::from("p1")));
    }

    #[test]
    fn skips_records_missing_either_key() {
        let records = vec![
            participation("r1", "", "p1", "2024/2025"),
            participation("r2", "s1", "  ", "2024/2025"),
            participation("r3", "s1", "p1", "2024/2025"),
        ];

        let index = create_school_participations_map(&records);

        assert_eq!(index.skipped(), 2);
        assert_eq!(index.programs_for(&SchoolId::from("s1")), &[ProgramId::from("p1")]);
        assert!(index.programs_for(&SchoolId::from("")).is_empty());
    }

    #[test]
    fn unknown_school_has_no_programs() {
        let index = ParticipationIndex::default();
        assert!(index.programs_for(&SchoolId::from("missing")).is_empty());
        assert!(!index.participates(&SchoolId::from("missing"), &ProgramId::from("p1")));
    }
}

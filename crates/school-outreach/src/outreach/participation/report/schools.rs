use super::super::domain::{Program, ProgramId, School, SchoolId};
use super::super::eligibility::applicable_programs;
use super::super::index::ParticipationIndex;
use serde::Serialize;

/// Eligible programs of one school, split by whether the school ran them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolParticipationInfo {
    pub school_id: SchoolId,
    pub school_name: String,
    pub participating: Vec<Program>,
    pub not_participating: Vec<Program>,
}

impl SchoolParticipationInfo {
    pub fn eligible_count(&self) -> usize {
        self.participating.len() + self.not_participating.len()
    }

    pub fn has_gaps(&self) -> bool {
        !self.not_participating.is_empty()
    }

    /// True when the program is eligible for this school, in either list.
    pub fn covers(&self, program_id: &ProgramId) -> bool {
        self.participating
            .iter()
            .chain(self.not_participating.iter())
            .any(|program| &program.id == program_id)
    }
}

/// One entry per school, in input order.
pub fn calculate_school_participation_info(
    schools: &[School],
    programs: &[Program],
    index: &ParticipationIndex,
) -> Vec<SchoolParticipationInfo> {
    schools
        .iter()
        .map(|school| {
            let (participating, not_participating): (Vec<&Program>, Vec<&Program>) =
                applicable_programs(school, programs)
                    .into_iter()
                    .partition(|program| index.participates(&school.id, &program.id));

            SchoolParticipationInfo {
                school_id: school.id.clone(),
                school_name: school.name.clone(),
                participating: participating.into_iter().cloned().collect(),
                not_participating: not_participating.into_iter().cloned().collect(),
            }
        })
        .collect()
}

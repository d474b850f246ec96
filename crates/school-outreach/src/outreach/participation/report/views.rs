use super::super::domain::{Program, ProgramId, SchoolId};
use super::summary::GeneralStats;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramStatsEntry {
    pub program_id: ProgramId,
    pub program_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_code: Option<String>,
    pub eligible: usize,
    pub participating: usize,
    pub not_participating: usize,
    pub coverage_pct: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramRef {
    pub id: ProgramId,
    pub name: String,
}

impl From<&Program> for ProgramRef {
    fn from(program: &Program) -> Self {
        Self {
            id: program.id.clone(),
            name: program.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolParticipationView {
    pub school_id: SchoolId,
    pub school_name: String,
    pub participating: Vec<ProgramRef>,
    pub not_participating: Vec<ProgramRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub general: GeneralStats,
    pub programs: Vec<ProgramStatsEntry>,
    pub schools: Vec<SchoolParticipationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramGap {
    pub program_id: ProgramId,
    pub program_name: String,
    pub missing_schools: usize,
    pub coverage_pct: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolGap {
    pub school_id: SchoolId,
    pub school_name: String,
    pub missing_programs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipationInsights {
    /// Participating school/program pairs over eligible pairs.
    pub coverage_pct: f32,
    pub fully_covered_schools: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub largest_program_gaps: Vec<ProgramGap>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schools_needing_outreach: Vec<SchoolGap>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
}

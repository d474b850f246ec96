use super::super::catalog::ProgramCatalog;
use super::super::domain::{ParticipationRecord, School};
use super::super::filters::{filter_by_school_year, YearFilter};
use super::super::index::ParticipationIndex;
use super::programs::{calculate_program_stats, ProgramStats};
use super::schools::{calculate_school_participation_info, SchoolParticipationInfo};
use super::views::{
    ParticipationInsights, ProgramRef, ProgramStatsEntry, SchoolParticipationView,
    StatisticsSummary,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Registry-wide counts shown on the dashboard cards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneralStats {
    pub total_schools: usize,
    /// Schools with at least one eligible program they do not run.
    pub non_participating_count: usize,
    /// Raw record count; a program run in two years counts twice.
    pub total_participations: usize,
    pub total_missing_participations: usize,
}

pub fn calculate_general_stats<'a, I>(
    schools: &[School],
    schools_info: &[SchoolParticipationInfo],
    program_stats: &ProgramStats,
    all_participations: I,
) -> GeneralStats
where
    I: IntoIterator<Item = &'a ParticipationRecord>,
{
    GeneralStats {
        total_schools: schools.len(),
        non_participating_count: schools_info.iter().filter(|info| info.has_gaps()).count(),
        total_participations: all_participations.into_iter().count(),
        total_missing_participations: program_stats.total_not_participating(),
    }
}

/// Which participation records feed the statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StatisticsQuery {
    #[serde(default)]
    pub school_year: YearFilter,
}

impl StatisticsQuery {
    pub fn for_year(school_year: YearFilter) -> Self {
        Self { school_year }
    }
}

/// Complete statistics for one set of inputs, recomputed from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolStatistics {
    pub query: StatisticsQuery,
    pub schools: Vec<SchoolParticipationInfo>,
    pub programs: ProgramStats,
    pub general: GeneralStats,
}

impl SchoolStatistics {
    pub fn compute(
        schools: &[School],
        catalog: &ProgramCatalog,
        participations: &[ParticipationRecord],
        query: &StatisticsQuery,
    ) -> Self {
        let considered = filter_by_school_year(participations, &query.school_year);
        let index = ParticipationIndex::from_records(considered.iter().copied());

        let schools_info = calculate_school_participation_info(schools, catalog.programs(), &index);
        let program_stats = calculate_program_stats(schools, catalog.programs(), &index);
        let general = calculate_general_stats(
            schools,
            &schools_info,
            &program_stats,
            considered.iter().copied(),
        );

        debug!(
            schools = general.total_schools,
            programs = program_stats.len(),
            participations = general.total_participations,
            skipped = index.skipped(),
            "computed participation statistics"
        );

        Self {
            query: *query,
            schools: schools_info,
            programs: program_stats,
            general,
        }
    }

    /// Presentation view: program names resolved, rows in catalog order.
    pub fn summary(&self, catalog: &ProgramCatalog) -> StatisticsSummary {
        let programs = catalog
            .programs()
            .iter()
            .filter_map(|program| {
                self.programs.get(&program.id).map(|item| ProgramStatsEntry {
                    program_id: program.id.clone(),
                    program_name: program.name.clone(),
                    program_code: program.code.clone(),
                    eligible: item.eligible,
                    participating: item.participating,
                    not_participating: item.not_participating,
                    coverage_pct: item.coverage_pct(),
                })
            })
            .collect();

        let schools = self
            .schools
            .iter()
            .map(SchoolParticipationInfo::to_view)
            .collect();

        StatisticsSummary {
            general: self.general,
            programs,
            schools,
        }
    }
}

impl SchoolParticipationInfo {
    pub fn to_view(&self) -> SchoolParticipationView {
        SchoolParticipationView {
            school_id: self.school_id.clone(),
            school_name: self.school_name.clone(),
            participating: self.participating.iter().map(ProgramRef::from).collect(),
            not_participating: self.not_participating.iter().map(ProgramRef::from).collect(),
        }
    }
}

impl StatisticsSummary {
    pub fn insights(&self) -> ParticipationInsights {
        super::generate_insights(self)
    }
}

use super::views::{ParticipationInsights, ProgramGap, SchoolGap, StatisticsSummary};

const PROGRAM_GAP_LIMIT: usize = 3;
const SCHOOL_GAP_LIMIT: usize = 5;

pub(crate) fn generate_insights(summary: &StatisticsSummary) -> ParticipationInsights {
    let eligible_pairs: usize = summary.programs.iter().map(|entry| entry.eligible).sum();
    let participating_pairs: usize = summary
        .programs
        .iter()
        .map(|entry| entry.participating)
        .sum();
    let coverage_pct = if eligible_pairs > 0 {
        participating_pairs as f32 / eligible_pairs as f32 * 100.0
    } else {
        0.0
    };

    let fully_covered_schools = summary
        .schools
        .iter()
        .filter(|school| !school.participating.is_empty() && school.not_participating.is_empty())
        .count();

    let mut program_gaps: Vec<ProgramGap> = summary
        .programs
        .iter()
        .filter(|entry| entry.not_participating > 0)
        .map(|entry| ProgramGap {
            program_id: entry.program_id.clone(),
            program_name: entry.program_name.clone(),
            missing_schools: entry.not_participating,
            coverage_pct: entry.coverage_pct,
        })
        .collect();
    program_gaps.sort_by(|a, b| b.missing_schools.cmp(&a.missing_schools));
    program_gaps.truncate(PROGRAM_GAP_LIMIT);

    let mut school_gaps: Vec<SchoolGap> = summary
        .schools
        .iter()
        .filter(|school| !school.not_participating.is_empty())
        .map(|school| SchoolGap {
            school_id: school.school_id.clone(),
            school_name: school.school_name.clone(),
            missing_programs: school
                .not_participating
                .iter()
                .map(|program| program.name.clone())
                .collect(),
        })
        .collect();
    school_gaps.sort_by(|a, b| b.missing_programs.len().cmp(&a.missing_programs.len()));
    school_gaps.truncate(SCHOOL_GAP_LIMIT);

    let general = &summary.general;
    let mut observations = Vec::new();
    if eligible_pairs > 0 {
        observations.push(format!(
            "{} of {} eligible school/program pairs active ({:.0}% coverage)",
            participating_pairs, eligible_pairs, coverage_pct
        ));
    }

    if general.non_participating_count > 0 {
        observations.push(format!(
            "{} of {} schools have at least one eligible program they do not run",
            general.non_participating_count, general.total_schools
        ));
    }

    if let Some(gap) = program_gaps.first() {
        observations.push(format!(
            "{} has the widest reach gap with {} eligible school{} not taking part",
            gap.program_name,
            gap.missing_schools,
            if gap.missing_schools == 1 { "" } else { "s" }
        ));
    }

    let untouched = summary
        .programs
        .iter()
        .filter(|entry| entry.participating == 0)
        .count();
    if untouched > 0 {
        observations.push(format!(
            "{} program{} without a single participating school",
            untouched,
            if untouched == 1 { "" } else { "s" }
        ));
    }

    if observations.is_empty() {
        observations.push("No eligible programs to report on".to_string());
    } else if general.total_missing_participations == 0 {
        observations.push("Every eligible school takes part in every eligible program".to_string());
    }

    ParticipationInsights {
        coverage_pct,
        fully_covered_schools,
        largest_program_gaps: program_gaps,
        schools_needing_outreach: school_gaps,
        observations,
    }
}

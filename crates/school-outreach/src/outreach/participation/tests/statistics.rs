use super::common::*;
use crate::outreach::participation::domain::{
    ParticipationRecord, Program, ProgramId, School, SchoolId,
};
use crate::outreach::participation::filters::YearFilter;
use crate::outreach::participation::index::ParticipationIndex;
use crate::outreach::participation::report::{
    calculate_general_stats, calculate_program_stats, calculate_school_participation_info,
    GeneralStats, ProgramStatsItem, SchoolStatistics, StatisticsQuery,
};
use std::collections::BTreeSet;

fn stats_for(id: &str, stats: &SchoolStatistics) -> ProgramStatsItem {
    *stats
        .programs
        .get(&ProgramId::from(id))
        .unwrap_or_else(|| panic!("stats for {id}"))
}

#[test]
fn scenario_counts_distinct_eligible_schools() {
    let stats = SchoolStatistics::compute(
        &scenario_schools(),
        &scenario_catalog(),
        &scenario_participations(),
        &StatisticsQuery::default(),
    );

    assert_eq!(
        stats_for("p1", &stats),
        ProgramStatsItem {
            eligible: 2,
            participating: 1,
            not_participating: 1
        }
    );
    assert_eq!(
        stats_for("p2", &stats),
        ProgramStatsItem {
            eligible: 3,
            participating: 2,
            not_participating: 1
        }
    );
    assert_eq!(
        stats_for("p3", &stats),
        ProgramStatsItem {
            eligible: 1,
            participating: 0,
            not_participating: 1
        }
    );
    assert_eq!(stats.general.non_participating_count, 2);
    assert_eq!(stats.general.total_missing_participations, 3);
    assert_eq!(stats.general.total_participations, 3);
    assert_eq!(stats.general.total_schools, 3);
}

#[test]
fn scenario_school_split_matches_expected_programs() {
    let stats = SchoolStatistics::compute(
        &scenario_schools(),
        &scenario_catalog(),
        &scenario_participations(),
        &StatisticsQuery::default(),
    );

    let s1 = &stats.schools[0];
    assert_eq!(s1.school_id, SchoolId::from("s1"));
    assert_eq!(s1.participating.len(), 2);
    assert!(s1.not_participating.is_empty());

    let s3 = &stats.schools[2];
    let missing: Vec<&str> = s3.not_participating.iter().map(|p| p.id.as_str()).collect();
    assert!(s3.participating.is_empty());
    assert_eq!(missing, vec!["p1", "p2"]);
}

#[test]
fn every_program_entry_splits_eligible_schools() {
    let stats = SchoolStatistics::compute(
        &scenario_schools(),
        &scenario_catalog(),
        &scenario_participations(),
        &StatisticsQuery::default(),
    );

    assert_eq!(stats.programs.len(), 3);
    for (_, item) in stats.programs.iter() {
        assert_eq!(item.eligible, item.participating + item.not_participating);
    }
}

#[test]
fn school_lists_partition_the_eligible_programs() {
    let schools = scenario_schools();
    let catalog = scenario_catalog();
    let stats = SchoolStatistics::compute(
        &schools,
        &catalog,
        &scenario_participations(),
        &StatisticsQuery::default(),
    );

    for (school, info) in schools.iter().zip(&stats.schools) {
        let participating: BTreeSet<&ProgramId> = info.participating.iter().map(|p| &p.id).collect();
        let missing: BTreeSet<&ProgramId> = info.not_participating.iter().map(|p| &p.id).collect();
        let eligible: BTreeSet<&ProgramId> = catalog
            .programs()
            .iter()
            .filter(|program| program.applies_to(school))
            .map(|program| &program.id)
            .collect();

        assert!(participating.is_disjoint(&missing));
        let union: BTreeSet<&ProgramId> = participating.union(&missing).copied().collect();
        assert_eq!(union, eligible);
    }
}

#[test]
fn recomputing_with_same_inputs_is_idempotent() {
    let schools = scenario_schools();
    let catalog = scenario_catalog();
    let records = scenario_participations();

    let first = SchoolStatistics::compute(&schools, &catalog, &records, &StatisticsQuery::default());
    let second = SchoolStatistics::compute(&schools, &catalog, &records, &StatisticsQuery::default());

    assert_eq!(first, second);
    assert_eq!(first.summary(&catalog), second.summary(&catalog));
}

#[test]
fn adding_a_record_moves_one_program_into_participating() {
    let schools = scenario_schools();
    let catalog = scenario_catalog();
    let mut records = scenario_participations();
    let before = SchoolStatistics::compute(&schools, &catalog, &records, &StatisticsQuery::default());

    records.push(participation("r4", "s3", "p1", "2024/2025"));
    let after = SchoolStatistics::compute(&schools, &catalog, &records, &StatisticsQuery::default());

    let s3_before = &before.schools[2];
    let s3_after = &after.schools[2];
    assert_eq!(s3_after.participating.len(), s3_before.participating.len() + 1);
    assert_eq!(
        s3_after.not_participating.len(),
        s3_before.not_participating.len() - 1
    );
    assert!(s3_after.participating.iter().any(|p| p.id.as_str() == "p1"));

    let p1_before = stats_for("p1", &before);
    let p1_after = stats_for("p1", &after);
    assert_eq!(p1_after.participating, p1_before.participating + 1);
    assert_eq!(p1_after.not_participating, p1_before.not_participating - 1);
    assert_eq!(p1_after.eligible, p1_before.eligible);
    assert_eq!(stats_for("p2", &after), stats_for("p2", &before));
}

#[test]
fn repeated_years_count_once_for_schools_but_twice_in_totals() {
    let schools = scenario_schools();
    let catalog = scenario_catalog();
    let mut records = scenario_participations();
    records.push(participation("r4", "s1", "p1", "2023/2024"));

    let stats = SchoolStatistics::compute(&schools, &catalog, &records, &StatisticsQuery::default());

    assert_eq!(stats_for("p1", &stats).participating, 1);
    assert_eq!(stats.general.total_participations, 4);
}

#[test]
fn year_query_limits_the_records_considered() {
    let schools = scenario_schools();
    let catalog = scenario_catalog();
    let mut records = scenario_participations();
    records.push(participation("r4", "s3", "p1", "2023/2024"));

    let query = StatisticsQuery::for_year(YearFilter::Year("2023/2024".parse().expect("year")));
    let stats = SchoolStatistics::compute(&schools, &catalog, &records, &query);

    assert_eq!(stats.general.total_participations, 1);
    assert_eq!(stats_for("p1", &stats).participating, 1);
    assert_eq!(stats_for("p2", &stats).participating, 0);
    assert!(stats.schools[2].participating.iter().any(|p| p.id.as_str() == "p1"));
}

#[test]
fn empty_inputs_give_zero_stats() {
    let index = ParticipationIndex::default();
    let infos = calculate_school_participation_info(&[], &[], &index);
    let programs = calculate_program_stats(&[], &[], &index);
    let records: Vec<ParticipationRecord> = Vec::new();
    let general = calculate_general_stats(&[], &infos, &programs, &records);

    assert!(infos.is_empty());
    assert!(programs.is_empty());
    assert_eq!(
        general,
        GeneralStats {
            total_schools: 0,
            non_participating_count: 0,
            total_participations: 0,
            total_missing_participations: 0,
        }
    );
}

#[test]
fn programs_without_eligible_schools_are_omitted() {
    let schools = vec![School::new(
        "s1",
        "SP 1",
        ["primary"],
    )];
    let catalog = scenario_catalog();
    let untyped = Program::new(
        "p9",
        "Unassigned",
        Vec::<&str>::new(),
    );
    let mut programs = catalog.programs().to_vec();
    programs.push(untyped);

    let index = ParticipationIndex::default();
    let stats = calculate_program_stats(&schools, &programs, &index);

    assert!(stats.contains(&ProgramId::from("p1")));
    assert!(!stats.contains(&ProgramId::from("p3")));
    assert!(!stats.contains(&ProgramId::from("p9")));
}

#[test]
fn schools_without_eligible_programs_are_not_counted_as_gaps() {
    let mut schools = scenario_schools();
    schools.push(School::new(
        "s4",
        "Music School",
        ["music"],
    ));
    let catalog = scenario_catalog();
    let stats = SchoolStatistics::compute(
        &schools,
        &catalog,
        &scenario_participations(),
        &StatisticsQuery::default(),
    );

    let music = &stats.schools[3];
    assert!(music.participating.is_empty());
    assert!(music.not_participating.is_empty());
    assert_eq!(stats.general.total_schools, 4);
    assert_eq!(stats.general.non_participating_count, 2);
}

#[test]
fn summary_resolves_names_in_catalog_order() {
    let catalog = scenario_catalog();
    let stats = SchoolStatistics::compute(
        &scenario_schools(),
        &catalog,
        &scenario_participations(),
        &StatisticsQuery::default(),
    );

    let summary = stats.summary(&catalog);
    let names: Vec<&str> = summary
        .programs
        .iter()
        .map(|entry| entry.program_name.as_str())
        .collect();
    assert_eq!(names, vec!["Reading Club", "Healthy Breakfast", "Career Day"]);
    assert!((summary.programs[0].coverage_pct - 50.0).abs() < 0.01);
    assert_eq!(summary.schools[2].not_participating[0].name, "Reading Club");
}

#[test]
fn insights_highlight_largest_gaps() {
    let catalog = scenario_catalog();
    let mut schools = scenario_schools();
    schools.push(School::new(
        "s4",
        "SP 4 Lublin",
        ["primary"],
    ));
    let stats = SchoolStatistics::compute(
        &schools,
        &catalog,
        &scenario_participations(),
        &StatisticsQuery::default(),
    );

    let insights = stats.summary(&catalog).insights();

    assert_eq!(insights.largest_program_gaps[0].program_id, ProgramId::from("p1"));
    assert_eq!(insights.largest_program_gaps[0].missing_schools, 2);
    assert_eq!(insights.fully_covered_schools, 1);
    assert_eq!(insights.schools_needing_outreach[0].missing_programs.len(), 2);
    // 3 participating pairs out of 8 eligible pairs.
    assert!((insights.coverage_pct - 37.5).abs() < 0.01);
    assert!(insights
        .observations
        .iter()
        .any(|note| note.contains("Career Day") || note.contains("without a single")));
}

#[test]
fn insights_on_empty_summary_report_nothing_to_do() {
    let catalog = scenario_catalog();
    let stats = SchoolStatistics::compute(&[], &catalog, &[], &StatisticsQuery::default());

    let insights = stats.summary(&catalog).insights();

    assert_eq!(insights.coverage_pct, 0.0);
    assert!(insights.largest_program_gaps.is_empty());
    assert_eq!(
        insights.observations,
        vec!["No eligible programs to report on".to_string()]
    );
}

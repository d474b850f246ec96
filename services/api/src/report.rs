use crate::infra::{parse_status_filter, parse_year_filter};
use clap::Args;
use school_outreach::config::AppConfig;
use school_outreach::error::AppError;
use school_outreach::outreach::import::{Dataset, DatasetImporter, ImportReport};
use school_outreach::outreach::participation::report::views::{
    ParticipationInsights, ProgramRef, ProgramStatsEntry, SchoolParticipationView,
};
use school_outreach::outreach::participation::{
    available_school_years, filter_by_program, filter_by_school_year, filter_schools_by_name,
    filter_schools_by_program, filter_schools_by_status, report_submitted_label,
    search_participations, GeneralStats, ParticipationId, ProgramFilter, SchoolParticipationInfo,
    SchoolYear, StatisticsQuery, StatusFilter, YearFilter,
};
use school_outreach::telemetry;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Directory holding schools.csv, participations.csv and optionally
    /// contacts.csv and programs.json
    #[arg(long)]
    pub(crate) data_dir: PathBuf,
    /// School year to report on (YYYY/YYYY or "all")
    #[arg(long, value_parser = parse_year_filter, default_value = "all")]
    pub(crate) year: YearFilter,
    /// Restrict programs and schools to one program id
    #[arg(long)]
    pub(crate) program: Option<String>,
    /// Participation status of listed schools (all, participating, not-participating)
    #[arg(long, value_parser = parse_status_filter, default_value = "all")]
    pub(crate) status: StatusFilter,
    /// Exact school name to list
    #[arg(long)]
    pub(crate) school: Option<String>,
    /// Free-text search over participation records
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Include the per-school breakdown in text output
    #[arg(long)]
    pub(crate) list_schools: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

/// What part of a dataset a report covers.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReportSelection {
    pub(crate) year: YearFilter,
    pub(crate) program: ProgramFilter,
    pub(crate) status: StatusFilter,
    pub(crate) school: Option<String>,
    pub(crate) search: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ParticipationReport {
    pub(crate) school_year: String,
    pub(crate) available_school_years: Vec<SchoolYear>,
    pub(crate) general: GeneralStats,
    pub(crate) programs: Vec<ProgramStatsEntry>,
    pub(crate) schools: Vec<SchoolParticipationView>,
    pub(crate) insights: ParticipationInsights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) matches: Option<Vec<ParticipationMatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) import: Option<ImportReport>,
}

/// A search hit with its references resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ParticipationMatch {
    pub(crate) id: ParticipationId,
    pub(crate) school_name: String,
    pub(crate) program_name: String,
    pub(crate) coordinator: String,
    pub(crate) school_year: SchoolYear,
    pub(crate) student_count: u32,
    pub(crate) report_submitted: &'static str,
}

pub(crate) fn build_report(dataset: &Dataset, selection: &ReportSelection) -> ParticipationReport {
    let statistics = dataset.statistics(&StatisticsQuery::for_year(selection.year));
    let summary = statistics.summary(&dataset.catalog);
    let insights = summary.insights();

    let program_id = match &selection.program {
        ProgramFilter::All => None,
        ProgramFilter::Program(id) => Some(id),
    };

    let schools = filter_schools_by_status(&statistics.schools, selection.status);
    let schools = filter_schools_by_program(schools, program_id);
    let schools = filter_schools_by_name(schools, selection.school.as_deref())
        .into_iter()
        .map(SchoolParticipationInfo::to_view)
        .collect();

    let programs = summary
        .programs
        .into_iter()
        .filter(|entry| program_id.map_or(true, |id| &entry.program_id == id))
        .collect();

    let matches = selection
        .search
        .as_deref()
        .map(|query| search_matches(dataset, selection, query));

    ParticipationReport {
        school_year: selection.year.to_string(),
        available_school_years: available_school_years(&dataset.participations),
        general: summary.general,
        programs,
        schools,
        insights,
        matches,
        import: None,
    }
}

fn search_matches(
    dataset: &Dataset,
    selection: &ReportSelection,
    query: &str,
) -> Vec<ParticipationMatch> {
    let schools = dataset.school_lookup();
    let contacts = dataset.contact_lookup();
    let programs = dataset.program_lookup();

    let in_year = filter_by_school_year(&dataset.participations, &selection.year);
    let candidates = filter_by_program(in_year, &selection.program);

    search_participations(candidates, &schools, &contacts, &programs, query)
        .into_iter()
        .map(|record| ParticipationMatch {
            id: record.id.clone(),
            school_name: schools
                .get(&record.school_id)
                .map(|school| school.name.clone())
                .unwrap_or_else(|| record.school_id.to_string()),
            program_name: programs
                .get(&record.program_id)
                .map(|program| program.name.clone())
                .unwrap_or_else(|| record.program_id.to_string()),
            coordinator: contacts
                .get(&record.coordinator_id)
                .map(|contact| contact.full_name())
                .unwrap_or_else(|| record.coordinator_id.to_string()),
            school_year: record.school_year,
            student_count: record.student_count,
            report_submitted: report_submitted_label(record.report_submitted),
        })
        .collect()
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        data_dir,
        year,
        program,
        status,
        school,
        search,
        list_schools,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = config.data.catalog()?;
    let importer = DatasetImporter::new(config.data.validator());
    let (dataset, import_report) = importer.load_dir(&data_dir, catalog)?;

    let selection = ReportSelection {
        year,
        program: program.map(ProgramFilter::from).unwrap_or_default(),
        status,
        school,
        search,
    };
    let mut report = build_report(&dataset, &selection);
    report.import = Some(import_report);

    if json {
        print_json(&report)
    } else {
        render_report(&report, list_schools);
        Ok(())
    }
}

pub(crate) fn print_json(report: &ParticipationReport) -> Result<(), AppError> {
    serde_json::to_writer_pretty(std::io::stdout().lock(), report).map_err(std::io::Error::from)?;
    println!();
    Ok(())
}

pub(crate) fn render_report(report: &ParticipationReport, list_schools: bool) {
    println!("Participation report (school year: {})", report.school_year);
    if !report.available_school_years.is_empty() {
        let years: Vec<String> = report
            .available_school_years
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Recorded school years: {}", years.join(", "));
    }

    let general = &report.general;
    println!("\nOverview");
    println!("- Schools: {}", general.total_schools);
    println!(
        "- Schools missing an eligible program: {}",
        general.non_participating_count
    );
    println!("- Participations: {}", general.total_participations);
    println!(
        "- Missing participations: {}",
        general.total_missing_participations
    );

    if report.programs.is_empty() {
        println!("\nPrograms: none with eligible schools");
    } else {
        println!("\nPrograms");
        for entry in &report.programs {
            let code = entry
                .program_code
                .as_deref()
                .map(|code| format!(" [{code}]"))
                .unwrap_or_default();
            println!(
                "- {}{}: {}/{} eligible schools, {} missing ({:.0}% coverage)",
                entry.program_name,
                code,
                entry.participating,
                entry.eligible,
                entry.not_participating,
                entry.coverage_pct
            );
        }
    }

    println!("\nInsights");
    for observation in &report.insights.observations {
        println!("- {observation}");
    }

    if !report.insights.schools_needing_outreach.is_empty() {
        println!("\nSchools needing outreach");
        for gap in &report.insights.schools_needing_outreach {
            println!("- {}: {}", gap.school_name, gap.missing_programs.join(", "));
        }
    }

    if list_schools {
        println!("\nSchools");
        for school in &report.schools {
            println!(
                "- {} | participating: {} | missing: {}",
                school.school_name,
                program_names(&school.participating),
                program_names(&school.not_participating)
            );
        }
    }

    if let Some(matches) = &report.matches {
        if matches.is_empty() {
            println!("\nMatching participations: none");
        } else {
            println!("\nMatching participations");
            for found in matches {
                println!(
                    "- {} | {} | {} | {} | coordinator {} | {} students | report {}",
                    found.id,
                    found.school_name,
                    found.program_name,
                    found.school_year,
                    found.coordinator,
                    found.student_count,
                    found.report_submitted
                );
            }
        }
    }

    if let Some(import) = &report.import {
        if !import.skipped.is_empty() {
            println!("\nSkipped rows");
            for row in &import.skipped {
                println!("- {}:{} {}", row.file, row.line, row.reason);
            }
        }
    }
}

fn program_names(programs: &[ProgramRef]) -> String {
    if programs.is_empty() {
        return "-".to_string();
    }
    programs
        .iter()
        .map(|program| program.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

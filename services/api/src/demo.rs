use crate::infra::parse_year_filter;
use crate::report::{build_report, print_json, render_report, ReportSelection};
use chrono::Utc;
use clap::Args;
use school_outreach::error::AppError;
use school_outreach::outreach::import::Dataset;
use school_outreach::outreach::participation::{
    Contact, ContactId, ParticipationId, ParticipationRecord, ProgramCatalog, ProgramId, School,
    SchoolId, SchoolYear, UserId, YearFilter,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// School year to report on (YYYY/YYYY or "all")
    #[arg(long, value_parser = parse_year_filter, default_value = "all")]
    pub(crate) year: YearFilter,
    /// Include the per-school breakdown
    #[arg(long)]
    pub(crate) list_schools: bool,
    /// Optional free-text search over the sample participations
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        year,
        list_schools,
        search,
        json,
    } = args;

    let dataset = sample_dataset();
    let selection = ReportSelection {
        year,
        search,
        ..ReportSelection::default()
    };
    let report = build_report(&dataset, &selection);

    if json {
        return print_json(&report);
    }

    println!("School outreach demo");
    println!(
        "Sample data: {} schools, {} programs, {} participations",
        dataset.schools.len(),
        dataset.catalog.len(),
        dataset.participations.len()
    );
    println!();
    render_report(&report, list_schools);
    Ok(())
}

/// Small regional dataset against the built-in program catalog.
pub(crate) fn sample_dataset() -> Dataset {
    let schools = vec![
        sample_school(
            "sp-5-gdansk",
            "Szkoła Podstawowa nr 5 w Gdańsku",
            &["primary"],
            "Gdańsk",
        ),
        sample_school(
            "lo-2-gdansk",
            "II Liceum Ogólnokształcące w Gdańsku",
            &["lyceum"],
            "Gdańsk",
        ),
        sample_school("p-12-sopot", "Przedszkole nr 12", &["kindergarten"], "Sopot"),
        sample_school(
            "zs-1-gdynia",
            "Zespół Szkół Technicznych",
            &["technical", "vocational"],
            "Gdynia",
        ),
        sample_school(
            "sp-3-wejherowo",
            "Szkoła Podstawowa nr 3",
            &["primary", "kindergarten"],
            "Wejherowo",
        ),
    ];

    let contacts = vec![
        sample_contact("c-nowak", "Anna", "Nowak"),
        sample_contact("c-kowalski", "Piotr", "Kowalski"),
    ];

    let current = SchoolYear::starting(2024);
    let previous = current.previous();
    let participations = vec![
        sample_record(1, "sp-5-gdansk", "run-for-health", current, "c-nowak", 48, true),
        sample_record(2, "sp-5-gdansk", "keep-fit", current, "c-nowak", 52, false),
        sample_record(3, "sp-5-gdansk", "hand-hygiene", previous, "c-nowak", 60, true),
        sample_record(4, "lo-2-gdansk", "ars", current, "c-kowalski", 31, false),
        sample_record(5, "p-12-sopot", "clean-air", current, "c-kowalski", 22, true),
        sample_record(6, "p-12-sopot", "eco-products", previous, "c-kowalski", 20, true),
        sample_record(7, "sp-3-wejherowo", "hand-hygiene", current, "c-nowak", 75, false),
    ];

    Dataset {
        schools,
        catalog: ProgramCatalog::standard(),
        contacts,
        participations,
    }
}

fn sample_school(id: &str, name: &str, types: &[&str], city: &str) -> School {
    School {
        city: city.to_string(),
        ..School::new(id, name, types)
    }
}

fn sample_contact(id: &str, first_name: &str, last_name: &str) -> Contact {
    Contact {
        id: ContactId::from(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@outreach.example.org", id.trim_start_matches("c-")),
        phone: String::new(),
    }
}

fn sample_record(
    seq: u32,
    school: &str,
    program: &str,
    school_year: SchoolYear,
    coordinator: &str,
    student_count: u32,
    report_submitted: bool,
) -> ParticipationRecord {
    ParticipationRecord {
        id: ParticipationId(format!("demo-{seq:03}")),
        school_id: SchoolId::from(school),
        program_id: ProgramId::from(program),
        school_year,
        coordinator_id: ContactId::from(coordinator),
        student_count,
        notes: String::new(),
        report_submitted,
        created_at: Utc::now(),
        created_by: UserId::from("demo"),
    }
}

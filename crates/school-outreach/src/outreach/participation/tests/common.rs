use chrono::{TimeZone, Utc};

use crate::outreach::participation::catalog::ProgramCatalog;
use crate::outreach::participation::domain::{
    Contact, ContactId, ParticipationId, ParticipationRecord, Program, ProgramId, School,
    SchoolId, UserId,
};

pub(crate) fn participation(
    id: &str,
    school: &str,
    program: &str,
    year: &str,
) -> ParticipationRecord {
    ParticipationRecord {
        id: ParticipationId::from(id),
        school_id: SchoolId::from(school),
        program_id: ProgramId::from(program),
        school_year: year.parse().expect("valid school year"),
        coordinator_id: ContactId::from("c1"),
        student_count: 25,
        notes: String::new(),
        report_submitted: false,
        created_at: Utc
            .with_ymd_and_hms(2024, 10, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
        created_by: UserId::from("u1"),
    }
}

pub(crate) fn scenario_schools() -> Vec<School> {
    vec![
        School::new("s1", "SP 1 Kraków", ["primary"]),
        School::new("s2", "II LO Gdańsk", ["lyceum"]),
        School::new("s3", "SP 3 Poznań", ["primary"]),
    ]
}

pub(crate) fn scenario_catalog() -> ProgramCatalog {
    ProgramCatalog::from_programs(vec![
        Program::new("p1", "Reading Club", ["primary"]),
        Program::new("p2", "Healthy Breakfast", ["primary", "lyceum"]),
        Program::new("p3", "Career Day", ["lyceum"]),
    ])
}

pub(crate) fn scenario_participations() -> Vec<ParticipationRecord> {
    vec![
        participation("r1", "s1", "p1", "2024/2025"),
        participation("r2", "s1", "p2", "2024/2025"),
        participation("r3", "s2", "p2", "2024/2025"),
    ]
}

pub(crate) fn coordinator() -> Contact {
    Contact {
        id: ContactId::from("c1"),
        first_name: "Anna".to_string(),
        last_name: "Nowak".to_string(),
        email: "anna.nowak@example.org".to_string(),
        phone: "+48 600 100 200".to_string(),
    }
}

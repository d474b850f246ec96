//! School program participation statistics.
//!
//! Every calculation here is a pure function of the schools, the program
//! catalog and the participation records it is given.

pub mod catalog;
pub mod domain;
pub mod eligibility;
pub mod filters;
pub mod index;
pub mod report;
pub mod search;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, ProgramCatalog};
pub use domain::{
    Contact, ContactId, ParticipationId, ParticipationRecord, Program, ProgramId, ProgramType,
    School, SchoolId, SchoolType, SchoolYear, SchoolYearError, UserId,
};
pub use eligibility::applicable_programs;
pub use filters::{
    available_school_years, filter_by_program, filter_by_school_year, filter_schools_by_name,
    filter_schools_by_program, filter_schools_by_status, FilterParseError, ProgramFilter,
    StatusFilter, YearFilter,
};
pub use index::{create_school_participations_map, ParticipationIndex};
pub use report::{
    calculate_general_stats, calculate_program_stats, calculate_school_participation_info,
    GeneralStats, ProgramStats, ProgramStatsItem, SchoolParticipationInfo, SchoolStatistics,
    StatisticsQuery,
};
pub use search::{report_submitted_label, search_participations};
pub use validation::{
    ParticipationDraft, ParticipationValidationError, ParticipationValidator, ValidationPolicy,
};

mod insights;
mod programs;
mod schools;
mod summary;
pub mod views;

pub use programs::{calculate_program_stats, ProgramStats, ProgramStatsItem};
pub use schools::{calculate_school_participation_info, SchoolParticipationInfo};
pub use summary::{calculate_general_stats, GeneralStats, SchoolStatistics, StatisticsQuery};

pub(crate) use insights::generate_insights;

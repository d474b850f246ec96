use super::super::domain::{Program, ProgramId, School};
use super::super::index::ParticipationIndex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// School counts for one program. `eligible` counts distinct schools.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramStatsItem {
    pub eligible: usize,
    pub participating: usize,
    pub not_participating: usize,
}

impl ProgramStatsItem {
    /// Share of eligible schools that participate, as a percentage.
    pub fn coverage_pct(&self) -> f32 {
        if self.eligible == 0 {
            0.0
        } else {
            self.participating as f32 / self.eligible as f32 * 100.0
        }
    }
}

/// Per-program statistics keyed by program id.
///
/// Programs with no eligible school (or no school types at all) have no
/// entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgramStats {
    items: HashMap<ProgramId, ProgramStatsItem>,
}

impl ProgramStats {
    pub fn get(&self, id: &ProgramId) -> Option<&ProgramStatsItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ProgramId) -> bool {
        self.items.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProgramId, &ProgramStatsItem)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of eligible-but-missing school/program pairs.
    pub fn total_not_participating(&self) -> usize {
        self.items.values().map(|item| item.not_participating).sum()
    }

    pub fn total_eligible(&self) -> usize {
        self.items.values().map(|item| item.eligible).sum()
    }
}

pub fn calculate_program_stats(
    schools: &[School],
    programs: &[Program],
    index: &ParticipationIndex,
) -> ProgramStats {
    let mut stats = ProgramStats::default();

    for program in programs {
        if program.school_types.is_empty() {
            continue;
        }

        let mut item = ProgramStatsItem::default();
        for school in schools.iter().filter(|school| program.applies_to(school)) {
            item.eligible += 1;
            if index.participates(&school.id, &program.id) {
                item.participating += 1;
            }
        }

        if item.eligible == 0 {
            continue;
        }
        item.not_participating = item.eligible - item.participating;

        if stats.items.insert(program.id.clone(), item).is_some() {
            warn!(program_id = %program.id, "program listed twice; keeping the later statistics");
        }
    }

    stats
}

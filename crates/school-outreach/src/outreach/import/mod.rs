//! Loading schools, coordinators, programs and participation records from
//! CSV/JSON exports.

mod normalizer;
mod parser;

use crate::outreach::participation::catalog::{CatalogError, ProgramCatalog};
use crate::outreach::participation::domain::{
    Contact, ContactId, ParticipationRecord, Program, ProgramId, School, SchoolId,
};
use crate::outreach::participation::report::{SchoolStatistics, StatisticsQuery};
use crate::outreach::participation::validation::ParticipationValidator;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const SCHOOLS_FILE: &str = "schools.csv";
pub const CONTACTS_FILE: &str = "contacts.csv";
pub const PARTICIPATIONS_FILE: &str = "participations.csv";
pub const PROGRAMS_FILE: &str = "programs.json";

#[derive(Debug)]
pub enum ImportError {
    Io {
        file: String,
        source: std::io::Error,
    },
    Csv {
        file: &'static str,
        source: csv::Error,
    },
    Catalog(CatalogError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io { file, source } => write!(f, "failed to read {}: {}", file, source),
            ImportError::Csv { file, source } => write!(f, "invalid CSV in {}: {}", file, source),
            ImportError::Catalog(err) => write!(f, "could not load program catalog: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io { source, .. } => Some(source),
            ImportError::Csv { source, .. } => Some(source),
            ImportError::Catalog(err) => Some(err),
        }
    }
}

impl From<CatalogError> for ImportError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// A row left out of the dataset and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub file: &'static str,
    pub line: u64,
    pub reason: String,
}

/// Data-quality outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub schools: usize,
    pub contacts: usize,
    pub participations: usize,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    fn skip(&mut self, file: &'static str, line: u64, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(file, line, %reason, "skipping row");
        self.skipped.push(SkippedRow { file, line, reason });
    }

    pub fn accepted(&self) -> usize {
        self.schools + self.contacts + self.participations
    }

    fn merge(&mut self, other: ImportReport) {
        self.schools += other.schools;
        self.contacts += other.contacts;
        self.participations += other.participations;
        self.skipped.extend(other.skipped);
    }
}

/// Everything the statistics engine needs, already validated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub schools: Vec<School>,
    pub catalog: ProgramCatalog,
    pub contacts: Vec<Contact>,
    pub participations: Vec<ParticipationRecord>,
}

impl Dataset {
    /// Loads a directory with default validation and the built-in catalog
    /// as fallback.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<(Self, ImportReport), ImportError> {
        DatasetImporter::default().load_dir(dir, ProgramCatalog::standard())
    }

    pub fn statistics(&self, query: &StatisticsQuery) -> SchoolStatistics {
        SchoolStatistics::compute(&self.schools, &self.catalog, &self.participations, query)
    }

    pub fn school_lookup(&self) -> HashMap<SchoolId, School> {
        self.schools
            .iter()
            .map(|school| (school.id.clone(), school.clone()))
            .collect()
    }

    pub fn contact_lookup(&self) -> HashMap<ContactId, Contact> {
        self.contacts
            .iter()
            .map(|contact| (contact.id.clone(), contact.clone()))
            .collect()
    }

    pub fn program_lookup(&self) -> HashMap<ProgramId, Program> {
        self.catalog.by_id()
    }
}

/// Reads exports into validated domain records.
#[derive(Debug, Clone, Default)]
pub struct DatasetImporter {
    validator: ParticipationValidator,
}

impl DatasetImporter {
    pub fn new(validator: ParticipationValidator) -> Self {
        Self { validator }
    }

    pub fn schools_from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<(Vec<School>, ImportReport), ImportError> {
        let rows = parser::parse_schools(reader).map_err(|source| ImportError::Csv {
            file: SCHOOLS_FILE,
            source,
        })?;

        let mut report = ImportReport::default();
        let mut seen: HashSet<SchoolId> = HashSet::new();
        let mut schools = Vec::with_capacity(rows.len());

        for row in rows {
            let Some(school) = row.value.into_school() else {
                report.skip(SCHOOLS_FILE, row.line, "missing school id");
                continue;
            };
            if !seen.insert(school.id.clone()) {
                report.skip(
                    SCHOOLS_FILE,
                    row.line,
                    format!("duplicate school id {}", school.id),
                );
                continue;
            }
            if school.school_types.is_empty() {
                warn!(school_id = %school.id, "school has no school types; no program will apply");
            }
            schools.push(school);
        }

        report.schools = schools.len();
        Ok((schools, report))
    }

    pub fn contacts_from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<(Vec<Contact>, ImportReport), ImportError> {
        let rows = parser::parse_contacts(reader).map_err(|source| ImportError::Csv {
            file: CONTACTS_FILE,
            source,
        })?;

        let mut report = ImportReport::default();
        let mut contacts = Vec::with_capacity(rows.len());

        for row in rows {
            match row.value.into_contact() {
                Some(contact) => contacts.push(contact),
                None => report.skip(CONTACTS_FILE, row.line, "missing contact id"),
            }
        }

        report.contacts = contacts.len();
        Ok((contacts, report))
    }

    pub fn participations_from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<(Vec<ParticipationRecord>, ImportReport), ImportError> {
        let rows = parser::parse_participations(reader).map_err(|source| ImportError::Csv {
            file: PARTICIPATIONS_FILE,
            source,
        })?;

        let mut report = ImportReport::default();
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let draft = match row.value.into_draft() {
                Ok(draft) => draft,
                Err(reason) => {
                    report.skip(PARTICIPATIONS_FILE, row.line, reason);
                    continue;
                }
            };

            match self.validator.validate(draft) {
                Ok(record) => records.push(record),
                Err(err) => report.skip(PARTICIPATIONS_FILE, row.line, err.to_string()),
            }
        }

        report.participations = records.len();
        Ok((records, report))
    }

    /// Loads `schools.csv`, `participations.csv`, and optionally
    /// `contacts.csv` and `programs.json` from a directory. Without a
    /// `programs.json` the given catalog is used.
    pub fn load_dir<P: AsRef<Path>>(
        &self,
        dir: P,
        fallback_catalog: ProgramCatalog,
    ) -> Result<(Dataset, ImportReport), ImportError> {
        let dir = dir.as_ref();
        let mut report = ImportReport::default();

        let (schools, schools_report) = self.schools_from_reader(open(&dir.join(SCHOOLS_FILE))?)?;
        report.merge(schools_report);

        let contacts_path = dir.join(CONTACTS_FILE);
        let contacts = if contacts_path.exists() {
            let (contacts, contacts_report) = self.contacts_from_reader(open(&contacts_path)?)?;
            report.merge(contacts_report);
            contacts
        } else {
            Vec::new()
        };

        let (participations, participations_report) =
            self.participations_from_reader(open(&dir.join(PARTICIPATIONS_FILE))?)?;
        report.merge(participations_report);

        let catalog_path = dir.join(PROGRAMS_FILE);
        let catalog = if catalog_path.exists() {
            ProgramCatalog::from_path(&catalog_path)?
        } else {
            fallback_catalog
        };

        info!(
            schools = report.schools,
            contacts = report.contacts,
            participations = report.participations,
            programs = catalog.len(),
            skipped = report.skipped.len(),
            "dataset loaded"
        );

        Ok((
            Dataset {
                schools,
                catalog,
                contacts,
                participations,
            },
            report,
        ))
    }
}

fn open(path: &Path) -> Result<std::fs::File, ImportError> {
    std::fs::File::open(path).map_err(|source| ImportError::Io {
        file: path.display().to_string(),
        source,
    })
}

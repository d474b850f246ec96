use super::domain::{school_types, Program, ProgramId, ProgramType};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read program catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid program catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable list of programs that schools can take part in.
///
/// Ids are unique within a catalog. Names should be unique as well; a
/// duplicate name is logged but kept, since statistics are keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramCatalog {
    programs: Vec<Program>,
    positions: HashMap<ProgramId, usize>,
}

impl ProgramCatalog {
    pub fn from_programs(programs: Vec<Program>) -> Self {
        let mut catalog = Self::default();
        let mut names: HashSet<String> = HashSet::new();

        for program in programs {
            if catalog.positions.contains_key(&program.id) {
                warn!(program_id = %program.id, "dropping duplicate program id from catalog");
                continue;
            }
            if !names.insert(program.name.trim().to_lowercase()) {
                warn!(
                    program_id = %program.id,
                    program_name = %program.name,
                    "program name is not unique within the catalog"
                );
            }

            catalog
                .positions
                .insert(program.id.clone(), catalog.programs.len());
            catalog.programs.push(program);
        }

        catalog
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let programs: Vec<Program> = serde_json::from_reader(reader)?;
        Ok(Self::from_programs(programs))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Built-in catalog of health-education programs run with schools.
    pub fn standard() -> Self {
        Self::from_programs(standard_programs())
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn get(&self, id: &ProgramId) -> Option<&Program> {
        self.positions.get(id).map(|&position| &self.programs[position])
    }

    pub fn name_of(&self, id: &ProgramId) -> Option<&str> {
        self.get(id).map(|program| program.name.as_str())
    }

    /// Catalog position, used to order report rows.
    pub fn position(&self, id: &ProgramId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn by_id(&self) -> HashMap<ProgramId, Program> {
        self.programs
            .iter()
            .map(|program| (program.id.clone(), program.clone()))
            .collect()
    }
}

fn standard_programs() -> Vec<Program> {
    vec![
        Program {
            id: ProgramId::from("clean-air"),
            name: "Czyste powietrze wokół nas".to_string(),
            code: Some("CPWN".to_string()),
            description: "Tobacco smoke awareness for preschool children and their parents."
                .to_string(),
            school_types: school_types(["kindergarten"]),
            program_type: ProgramType::Program,
        },
        Program {
            id: ProgramId::from("eco-products"),
            name: "Skąd się biorą produkty ekologiczne".to_string(),
            code: Some("SSBPE".to_string()),
            description: "Healthy eating and organic food origins for preschool groups."
                .to_string(),
            school_types: school_types(["kindergarten"]),
            program_type: ProgramType::Project,
        },
        Program {
            id: ProgramId::from("run-for-health"),
            name: "Bieg po zdrowie".to_string(),
            code: Some("BPZ".to_string()),
            description: "Smoking prevention through physical activity for grades 4 and up."
                .to_string(),
            school_types: school_types(["primary"]),
            program_type: ProgramType::Program,
        },
        Program {
            id: ProgramId::from("keep-fit"),
            name: "Trzymaj formę!".to_string(),
            code: Some("TF".to_string()),
            description: "Balanced diet and physical activity for older primary and secondary pupils."
                .to_string(),
            school_types: school_types(["primary", "lyceum", "technical", "vocational"]),
            program_type: ProgramType::Program,
        },
        Program {
            id: ProgramId::from("right-solution"),
            name: "Znajdź właściwe rozwiązanie".to_string(),
            code: Some("ZWR".to_string()),
            description: "Tobacco prevention for the final grades of primary school.".to_string(),
            school_types: school_types(["primary"]),
            program_type: ProgramType::Program,
        },
        Program {
            id: ProgramId::from("ars"),
            name: "ARS, czyli jak dbać o miłość?".to_string(),
            code: Some("ARS".to_string()),
            description: "Substance use prevention for secondary schools.".to_string(),
            school_types: school_types(["lyceum", "technical", "vocational"]),
            program_type: ProgramType::Program,
        },
        Program {
            id: ProgramId::from("hand-hygiene"),
            name: "Higiena rąk".to_string(),
            code: None,
            description: "Seasonal hand hygiene campaign.".to_string(),
            school_types: school_types(["kindergarten", "primary"]),
            program_type: ProgramType::Campaign,
        },
    ]
}

use super::domain::{Program, School};

/// Programs whose school types overlap the school's, in catalog order.
pub fn applicable_programs<'a, I>(school: &School, programs: I) -> Vec<&'a Program>
where
    I: IntoIterator<Item = &'a Program>,
{
    programs
        .into_iter()
        .filter(|program| program.applies_to(school))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_catalog_order_and_drops_disjoint_programs() {
        let school = School::new("s1", "SP 3", ["primary"]);
        let programs = vec![
            Program::new("p3", "Career Day", ["lyceum"]),
            Program::new("p2", "Healthy Breakfast", ["primary", "lyceum"]),
            Program::new("p1", "Reading Club", ["primary"]),
        ];

        let ids: Vec<&str> = applicable_programs(&school, &programs)
            .into_iter()
            .map(|program| program.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let school = School::new("s1", "SP 3", ["primary"]);
        assert!(applicable_programs(&school, &Vec::<Program>::new()).is_empty());
    }

    #[test]
    fn school_without_types_matches_nothing() {
        let school = School::new("s1", "Untyped", Vec::<&str>::new());
        let programs = vec![Program::new("p1", "Reading Club", ["primary"])];
        assert!(applicable_programs(&school, &programs).is_empty());
    }
}

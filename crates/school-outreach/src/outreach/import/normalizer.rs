/// Strips invisible characters and collapses runs of whitespace.
pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{00a0}'], " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a multi-valued school-type cell (`primary; lyceum` or `primary|lyceum`).
pub(crate) fn split_school_types(value: &str) -> Vec<String> {
    value
        .split([';', '|'])
        .map(clean_text)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Interprets a yes/no cell; unknown values yield `None`.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match clean_text(value).to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "tak" | "t" => Some(true),
        "0" | "false" | "no" | "n" | "nie" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_removes_bom_and_extra_spaces() {
        assert_eq!(clean_text("\u{feff}SP  12 \u{00a0} Warszawa "), "SP 12 Warszawa");
    }

    #[test]
    fn school_types_split_on_semicolons_and_pipes() {
        assert_eq!(
            split_school_types("primary; lyceum|| technical "),
            vec!["primary", "lyceum", "technical"]
        );
        assert!(split_school_types("  ").is_empty());
    }

    #[test]
    fn flags_accept_english_and_polish() {
        assert_eq!(parse_flag("Tak"), Some(true));
        assert_eq!(parse_flag(" nie "), Some(false));
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }
}

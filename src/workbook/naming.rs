//! Sheet naming.
//!
//! Spreadsheet sheet names are limited to 31 characters and may not contain
//! `\ / ? * [ ] :`.

use std::collections::HashSet;

/// Maximum sheet name length in characters.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: [char; 7] = ['\\', '/', '?', '*', '[', ']', ':'];

/// Builds the sheet name for one employee.
///
/// The name is `"{name} - {id}"`. When that exceeds 31 characters the name
/// part is cut and marked with `..` so the id survives intact. Forbidden
/// characters are stripped afterwards, as are leading apostrophes (sheet
/// names may not start with one), and the result is capped at 31.
///
/// # Example
///
/// ```
/// use grade_engine::workbook::sheet_name;
///
/// assert_eq!(sheet_name("Fatma KARACA", "10000000146"), "Fatma KARACA - 10000000146");
/// assert_eq!(
///     sheet_name("Abdurrahman Mehmet Ali ÖZTÜRKOĞLU", "10000000146"),
///     "Abdurrahman Meh.. - 10000000146"
/// );
/// ```
pub fn sheet_name(name: &str, id: &str) -> String {
    let full = format!("{} - {}", name, id);
    let base = if full.chars().count() > MAX_SHEET_NAME_LEN {
        let keep = MAX_SHEET_NAME_LEN.saturating_sub(id.chars().count() + 5);
        let short: String = name.chars().take(keep).collect();
        format!("{}.. - {}", short, id)
    } else {
        full
    };

    let cleaned: String = base.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    cleaned
        .trim_start_matches(['\'', ' '])
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

/// Hands out sheet names that are unique within one workbook.
///
/// Spreadsheet programs compare sheet names case-insensitively, so two
/// employees with the same name and id (or a name differing only in case)
/// would otherwise collide. Later duplicates get a `~2`, `~3`, ... suffix
/// that still fits the length limit.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    /// Creates an empty namer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as taken without handing it out.
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_lowercase());
    }

    /// Returns a unique sheet name for an employee.
    pub fn assign(&mut self, name: &str, id: &str) -> String {
        let base = sheet_name(name, id);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("~{}", n);
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_names_are_kept() {
        assert_eq!(sheet_name("Ali YILMAZ", "10000000078"), "Ali YILMAZ - 10000000078");
    }

    #[test]
    fn test_long_names_keep_the_id() {
        let name = sheet_name("Zeynep Nur Gülşen KARAOSMANOĞLU", "10000050028");
        assert_eq!(name.chars().count(), 31);
        assert!(name.ends_with(".. - 10000050028"));
    }

    #[test]
    fn test_exactly_thirty_one_is_untouched() {
        let name = "A".repeat(31 - 14);
        let result = sheet_name(&name, "10000000146");
        assert_eq!(result.chars().count(), 31);
        assert!(!result.contains(".."));
    }

    #[test]
    fn test_forbidden_characters_are_stripped() {
        assert_eq!(
            sheet_name("A/B\\C?D*E[F]G:H", "10000000146"),
            "ABCDEFGH - 10000000146"
        );
    }

    #[test]
    fn test_leading_apostrophes_are_stripped() {
        assert_eq!(sheet_name("'Ali YILMAZ", "10000000078"), "Ali YILMAZ - 10000000078");
        assert_eq!(sheet_name("'' Ali", "10000000078"), "Ali - 10000000078");
        assert_eq!(sheet_name("Ali 'Can'", "10000000078"), "Ali 'Can' - 10000000078");
    }

    #[test]
    fn test_namer_deduplicates_case_insensitively() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.assign("Ali YILMAZ", "10000000078"), "Ali YILMAZ - 10000000078");
        assert_eq!(namer.assign("ali yilmaz", "10000000078"), "ali yilmaz - 10000000078~2");
        assert_eq!(namer.assign("Ali YILMAZ", "10000000078"), "Ali YILMAZ - 10000000078~3");
    }

    #[test]
    fn test_namer_suffix_respects_length_limit() {
        let mut namer = SheetNamer::new();
        let long = "Zeynep Nur Gülşen KARAOSMANOĞLU";
        let first = namer.assign(long, "10000050028");
        let second = namer.assign(long, "10000050028");
        assert_ne!(first, second);
        assert_eq!(second.chars().count(), 31);
        assert!(second.ends_with("~2"));
    }

    #[test]
    fn test_reserved_names_are_skipped() {
        let mut namer = SheetNamer::new();
        namer.reserve("Ali - 10000000078");
        assert_eq!(namer.assign("Ali", "10000000078"), "Ali - 10000000078~2");
    }

    proptest! {
        #[test]
        fn prop_sheet_names_are_bounded_and_clean(name in "\\PC{1,60}", id in "[1-9][0-9]{10}") {
            let result = sheet_name(&name, &id);
            prop_assert!(result.chars().count() <= MAX_SHEET_NAME_LEN);
            prop_assert!(!result.chars().any(|c| FORBIDDEN.contains(&c)));
            prop_assert!(!result.starts_with('\''));
        }

        #[test]
        fn prop_id_survives_for_clean_names(name in "[A-Za-zÇĞİÖŞÜçğıöşü ]{1,60}", id in "[1-9][0-9]{10}") {
            let result = sheet_name(&name, &id);
            prop_assert!(result.ends_with(&id));
        }
    }
}

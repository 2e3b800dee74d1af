// Canonical forms for month labels, years and problem titles shared by both catalogs
use regex::Regex;
use std::sync::LazyLock;

static DIVISION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\[(](?:bronze|silver|gold|platinum)[\])]\s*").expect("valid regex")
});

static VARIANT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\((?:easier|harder|new version|old tests|new tests)\)\s*").expect("valid regex")
});

/// Maps a usaco.org contest label to the month code Probgate uses.
/// Unknown labels are returned unchanged.
pub fn normalize_month(label: &str) -> &str {
    match label {
        "January" => "JAN",
        "February" => "FEB",
        "March" => "MAR",
        "April" => "APR",
        "November" => "NOV",
        "December" => "DEC",
        "US Open" => "OPEN",
        other => other,
    }
}

/// Expands a two-character year to "20xx"; any other length is left alone.
pub fn normalize_year(year: &str) -> String {
    if year.chars().count() == 2 {
        format!("20{}", year)
    } else {
        year.to_string()
    }
}

/// Strips division tags and variant suffixes, then trims and lowercases.
///
/// Removal is repeated until nothing changes, so a tag that only becomes
/// visible after an inner tag is removed is stripped too and the result is
/// a fixed point.
pub fn clean_problem_name(name: &str) -> String {
    let mut current = clean_once(name);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(name: &str) -> String {
    let without_division = DIVISION_TAG.replace_all(name, " ");
    let without_variant = VARIANT_SUFFIX.replace_all(&without_division, " ");
    without_variant.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_map_to_codes() {
        assert_eq!(normalize_month("January"), "JAN");
        assert_eq!(normalize_month("February"), "FEB");
        assert_eq!(normalize_month("December"), "DEC");
        assert_eq!(normalize_month("US Open"), "OPEN");
        assert_eq!(normalize_month("November"), "NOV");
        assert_eq!(normalize_month("March"), "MAR");
    }

    #[test]
    fn unknown_month_passes_through() {
        assert_eq!(normalize_month("OPEN"), "OPEN");
        assert_eq!(normalize_month("Camp"), "Camp");
        assert_eq!(normalize_month(""), "");
    }

    #[test]
    fn two_char_years_get_century() {
        assert_eq!(normalize_year("22"), "2022");
        assert_eq!(normalize_year("ab"), "20ab");
        assert_eq!(normalize_year("2022"), "2022");
        assert_eq!(normalize_year("5"), "5");
        assert_eq!(normalize_year(""), "");
    }

    #[test]
    fn normalize_year_is_idempotent() {
        for y in ["22", "2022", "9", "123", "", "xy"] {
            let once = normalize_year(y);
            assert_eq!(normalize_year(&once), once);
        }
    }

    #[test]
    fn strips_division_tags_any_case() {
        assert_eq!(clean_problem_name("Marathon Cheating (Bronze)"), "marathon cheating");
        assert_eq!(clean_problem_name("Cow Gymnastics [silver]"), "cow gymnastics");
        assert_eq!(clean_problem_name("Left Out (PLATINUM)"), "left out");
    }

    #[test]
    fn strips_variant_suffixes() {
        assert_eq!(clean_problem_name("Milk Measurement (Easier)"), "milk measurement");
        assert_eq!(clean_problem_name("Cow Art (Old Tests)"), "cow art");
        assert_eq!(clean_problem_name("Paint (new version)"), "paint");
    }

    #[test]
    fn tag_in_the_middle_keeps_words_apart() {
        assert_eq!(clean_problem_name("Milk (Gold) Pails"), "milk pails");
    }

    #[test]
    fn keeps_other_parentheses() {
        assert_eq!(clean_problem_name("Breed Counting (2)"), "breed counting (2)");
        assert_eq!(clean_problem_name("  Photoshoot 3  "), "photoshoot 3");
    }

    #[test]
    fn clean_is_idempotent() {
        let inputs = [
            "Marathon Cheating (Bronze)",
            "A (Gol(Bronze)d)",
            "Cow Art (Old Tests) (Silver)",
            "X (Eas(Gold)ier)",
            "  (bronze)  ",
            "Hoof, Paper, Scissors",
            "",
        ];
        for input in inputs {
            let once = clean_problem_name(input);
            assert_eq!(clean_problem_name(&once), once, "input: {input:?}");
        }
    }
}

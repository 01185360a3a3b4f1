//! Pipeline naming conventions
//!
//! A deployed pipeline is named after its definition file's stem, with the
//! trailing build number varying per build: `p1-reports-7.json` deploys as
//! `p1-reports-7` and retires whatever `p1-reports-<n>` is currently live.
//! The retirement pattern generalizes exactly that trailing number; every
//! literal character is escaped so file names cannot widen the match.

use std::path::Path;

/// The remote name for a pipeline deployed from `file_name`: its file stem
pub fn pipeline_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// The pattern that matches prior deployments of `file_name`
///
/// The stem's trailing run of digits, when present, becomes `\d+`; the rest
/// is matched literally. The lookup anchors the pattern to the whole name,
/// so a stem without a build number matches only itself.
pub fn retirement_pattern(file_name: &str) -> String {
    let stem = pipeline_name(file_name);
    let literal_end = stem
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);

    if literal_end == stem.len() {
        regex::escape(&stem)
    } else {
        format!(r"{}\d+", regex::escape(&stem[..literal_end]))
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    fn anchored(pattern: &str) -> Regex {
        Regex::new(&format!("^(?:{pattern})$")).unwrap()
    }

    #[test]
    fn test_pipeline_name_strips_extension() {
        assert_eq!(pipeline_name("p1-reports-7.json"), "p1-reports-7");
        assert_eq!(pipeline_name("daily.json"), "daily");
        assert_eq!(pipeline_name("no-extension"), "no-extension");
    }

    #[test]
    fn test_pattern_generalizes_trailing_build_number() {
        let matcher = anchored(&retirement_pattern("p1-reports-7.json"));

        assert!(matcher.is_match("p1-reports-1"));
        assert!(matcher.is_match("p1-reports-7"));
        assert!(matcher.is_match("p1-reports-412"));
        assert!(!matcher.is_match("p1-report-1"));
        assert!(!matcher.is_match("p1-reports-"));
        assert!(!matcher.is_match("p1-reports-1-final"));
    }

    #[test]
    fn test_pattern_without_build_number_matches_only_itself() {
        let matcher = anchored(&retirement_pattern("daily.json"));

        assert!(matcher.is_match("daily"));
        assert!(!matcher.is_match("daily2"));
        assert!(!matcher.is_match("dailyX"));
    }

    #[test]
    fn test_pattern_escapes_regex_metacharacters() {
        let matcher = anchored(&retirement_pattern("p1.reports-3.json"));

        assert!(matcher.is_match("p1.reports-9"));
        assert!(!matcher.is_match("p1xreports-9"));
    }

    #[test]
    fn test_all_digit_stem_generalizes_whole_name() {
        let matcher = anchored(&retirement_pattern("2024.json"));

        assert!(matcher.is_match("2025"));
        assert!(!matcher.is_match("v2025"));
    }
}

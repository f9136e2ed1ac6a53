//! Column splitting shared by the row assembler and the spare-parts reader.

use regex::Regex;
use std::sync::OnceLock;

/// Column delimiters: runs of two or more spaces, or dot leaders of three or
/// more periods.
fn delimiter() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" {2,}|\.{3,}").unwrap())
}

/// Split a line into trimmed, non-empty column candidates.
///
/// Stray periods and whitespace left around each candidate (from partial
/// dot leaders) are removed.
pub fn split_columns(line: &str) -> Vec<String> {
    delimiter()
        .split(line)
        .map(|part| part.trim_matches(|c: char| c == '.' || c.is_whitespace()))
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a line begins with an ASCII digit (a numbered entry).
pub fn starts_with_digit(line: &str) -> bool {
    line.chars().next().map_or(false, |c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_space_runs() {
        assert_eq!(
            split_columns("1  EM948630  DECAL, PUSH TO STOP  1"),
            vec!["1", "EM948630", "DECAL, PUSH TO STOP", "1"]
        );
    }

    #[test]
    fn test_split_on_dot_leaders() {
        assert_eq!(
            split_columns("6............07055-034 .............................V-BELT, 4L340"),
            vec!["6", "07055-034", "V-BELT, 4L340"]
        );
    }

    #[test]
    fn test_split_mixed_delimiters() {
        assert_eq!(
            split_columns("3.....12345  BOLT, HEX..  2"),
            vec!["3", "12345", "BOLT, HEX", "2"]
        );
    }

    #[test]
    fn test_single_spaces_do_not_split() {
        assert_eq!(split_columns("DECAL, PUSH TO STOP"), vec!["DECAL, PUSH TO STOP"]);
        assert!(split_columns("   ...   ").is_empty());
    }

    #[test]
    fn test_tabs_are_not_delimiters() {
        assert_eq!(split_columns("1  EM1\tBOLT  2"), vec!["1", "EM1\tBOLT", "2"]);
    }

    #[test]
    fn test_starts_with_digit() {
        assert!(starts_with_digit("12 EM1"));
        assert!(!starts_with_digit("NO."));
        assert!(!starts_with_digit(""));
    }
}

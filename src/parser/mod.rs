pub mod labels;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{Category, FieldDescriptor};
use crate::normalize::display_label;

// "First Name*: John", "Email - a@b.c", "Phone — 98765"
static SAME_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z\s\-_]+)[*\s]*[:\-–—]\s*(.+)$").unwrap());
// "First Name*" with the value on the next line
static LABEL_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z\s\-_]+)[*\s]*$").unwrap());
static TRAILING_STARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*\s]+$").unwrap());

/// One label/value pair lifted from pasted text. `index` is first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedField {
    pub label: String,
    pub value: String,
    pub index: usize,
}

impl ParsedField {
    /// Category by label keywords alone.
    pub fn category(&self) -> Option<Category> {
        labels::detect_field_type(&self.label)
    }

    pub fn display_label(&self) -> String {
        display_label(&self.label)
    }

    /// Descriptor carrying only the label, for the full classifier.
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            label: self.label.clone(),
            ..Default::default()
        }
    }
}

/// Split pasted text into ordered label/value pairs.
///
/// Lines that fit neither the same-line nor the two-line shape are skipped.
/// Empty or blank input yields an empty vec.
pub fn parse(text: &str) -> Vec<ParsedField> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut fields = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // ── Same line: label, separator, value ──
        if let Some(caps) = SAME_LINE_RE.captures(line) {
            push_field(&mut fields, &caps[1], &caps[2]);
            i += 1;
            continue;
        }

        // ── Two lines: label alone, value below ──
        if let Some(caps) = LABEL_ONLY_RE.captures(line) {
            if let Some(next) = lines.get(i + 1) {
                if !looks_like_label(next) && push_field(&mut fields, &caps[1], next) {
                    i += 2;
                    continue;
                }
            }
        }

        i += 1;
    }

    debug!(lines = lines.len(), fields = fields.len(), "parsed text block");
    fields
}

/// Trim, collapse whitespace, drop trailing `*`/space runs. Case is kept.
pub fn normalize_label(label: &str) -> String {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    TRAILING_STARS_RE.replace(&collapsed, "").trim().to_string()
}

/// A line that would start its own field rather than be a value.
///
/// Any `Label: value` line counts. A bare line counts only when it is marked
/// required (`*`) or is, as a whole, a known label. Keyword matching inside
/// the line would swallow values such as "Dobbs" or "Marcella".
fn looks_like_label(line: &str) -> bool {
    if SAME_LINE_RE.is_match(line) {
        return true;
    }
    match LABEL_ONLY_RE.captures(line) {
        Some(caps) => {
            line.trim_end().ends_with('*') || labels::is_known_label(&normalize_label(&caps[1]))
        }
        None => false,
    }
}

fn push_field(fields: &mut Vec<ParsedField>, raw_label: &str, raw_value: &str) -> bool {
    let label = normalize_label(raw_label);
    let value = raw_value.trim();
    if label.is_empty() || value.is_empty() {
        return false;
    }
    fields.push(ParsedField {
        label,
        value: value.to_string(),
        index: fields.len(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(fields: &[ParsedField]) -> Vec<(&str, &str, usize)> {
        fields
            .iter()
            .map(|f| (f.label.as_str(), f.value.as_str(), f.index))
            .collect()
    }

    #[test]
    fn same_line_with_asterisk() {
        let fields = parse("First Name*: John\nEmail: john@test.com");
        assert_eq!(
            pairs(&fields),
            vec![("First Name", "John", 0), ("Email", "john@test.com", 1)]
        );
    }

    #[test]
    fn two_line_label_then_value() {
        let fields = parse("First Name\nJohn");
        assert_eq!(pairs(&fields), vec![("First Name", "John", 0)]);
    }

    #[test]
    fn dash_separators() {
        let fields = parse("Phone - 9876543210\nCity – Pune\nState — Maharashtra");
        assert_eq!(
            pairs(&fields),
            vec![
                ("Phone", "9876543210", 0),
                ("City", "Pune", 1),
                ("State", "Maharashtra", 2)
            ]
        );
    }

    #[test]
    fn hyphenated_label_keeps_its_hyphen() {
        let fields = parse("E-mail: a@b.co");
        assert_eq!(pairs(&fields), vec![("E-mail", "a@b.co", 0)]);
    }

    #[test]
    fn label_followed_by_label_is_skipped() {
        let fields = parse("First Name*\nLast Name*\nDoe");
        assert_eq!(pairs(&fields), vec![("Last Name", "Doe", 0)]);
    }

    #[test]
    fn label_followed_by_same_line_pair_is_skipped() {
        let fields = parse("Hobbies\nCity: Pune");
        assert_eq!(pairs(&fields), vec![("City", "Pune", 0)]);
    }

    #[test]
    fn unknown_label_with_plain_value() {
        let fields = parse("Hobbies\nReading");
        assert_eq!(pairs(&fields), vec![("Hobbies", "Reading", 0)]);
    }

    #[test]
    fn noise_lines_are_skipped() {
        let fields = parse("Application form\nEmail: x@y.z\n\n   \n12345\n!!!");
        assert_eq!(pairs(&fields), vec![("Email", "x@y.z", 0)]);
    }

    #[test]
    fn surnames_containing_label_words_are_values() {
        assert_eq!(pairs(&parse("Last Name\nDobbs")), vec![("Last Name", "Dobbs", 0)]);
        assert_eq!(pairs(&parse("Last Name\nSexton")), vec![("Last Name", "Sexton", 0)]);
        assert_eq!(pairs(&parse("First Name\nMarcella")), vec![("First Name", "Marcella", 0)]);
        assert_eq!(
            pairs(&parse("College\nDelhi University")),
            vec![("College", "Delhi University", 0)]
        );
    }

    #[test]
    fn bare_known_label_is_not_a_value() {
        let fields = parse("First Name\nLast Name\nDoe");
        assert_eq!(pairs(&fields), vec![("Last Name", "Doe", 0)]);
    }

    #[test]
    fn trailing_label_without_value() {
        assert!(parse("First Name").is_empty());
    }

    #[test]
    fn empty_input() {
        assert!(parse("").is_empty());
        assert!(parse(" \n\t\n").is_empty());
    }

    #[test]
    fn indices_strictly_increase_and_values_non_empty() {
        let text = std::fs::read_to_string("tests/fixtures/application.txt").unwrap();
        let fields = parse(&text);
        assert!(!fields.is_empty());
        for (i, f) in fields.iter().enumerate() {
            assert_eq!(f.index, i);
            assert!(!f.value.is_empty());
        }
    }

    #[test]
    fn parse_is_idempotent() {
        let text = std::fs::read_to_string("tests/fixtures/application.txt").unwrap();
        assert_eq!(parse(&text), parse(&text));
    }

    #[test]
    fn application_fixture() {
        let text = std::fs::read_to_string("tests/fixtures/application.txt").unwrap();
        let fields = parse(&text);
        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "First Name",
                "Last Name",
                "Email",
                "Mobile",
                "Date of Birth",
                "Gender",
                "City",
                "College",
                "Passing Year",
                "LinkedIn"
            ]
        );
        let categories: Vec<_> = fields.iter().map(|f| f.category()).collect();
        assert_eq!(categories[0], Some(Category::FirstName));
        assert_eq!(categories[3], Some(Category::PhoneNational));
        assert_eq!(categories[7], Some(Category::Organization));
        assert_eq!(categories[9], Some(Category::LinkedinUrl));
    }

    #[test]
    fn normalize_label_strips_required_marks() {
        assert_eq!(normalize_label("  First   Name * * "), "First Name");
        assert_eq!(normalize_label("Email"), "Email");
    }

    #[test]
    fn parsed_field_helpers() {
        let f = &parse("date of birth*: 01/02/2000")[0];
        assert_eq!(f.display_label(), "Date Of Birth");
        assert_eq!(f.category(), Some(Category::DateOfBirth));
        assert_eq!(f.descriptor().label, "date of birth");
    }
}

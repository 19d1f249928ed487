//! Analysis text formatting
//!
//! The model's answer is loosely structured text. Each line is classified by
//! prefix, in this order: numbered section header, dash-prefixed
//! `label: value` pair, dash-prefixed bullet, then plain paragraph.

use serde::Serialize;
use std::fmt;

/// Markdown decoration removed before classification.
const DECORATION: [char; 4] = ['*', '_', '#', '`'];
const BYTE_ORDER_MARK: char = '\u{feff}';

/// One display unit produced from a single non-empty input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    SectionHeader { text: String },
    LabeledItem { label: String, value: String },
    BulletItem { text: String },
    Paragraph { text: String },
}

/// Split `text` into display fragments, preserving line order.
pub fn format_analysis(text: &str) -> Vec<Fragment> {
    text.split('\n').filter_map(format_line).collect()
}

/// Classify a single line. Blank lines (after cleanup) yield `None`.
pub fn format_line(line: &str) -> Option<Fragment> {
    let cleaned: String = line.chars().filter(|c| !DECORATION.contains(c)).collect();
    let line = cleaned.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK);
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = strip_section_number(line) {
        return Some(Fragment::SectionHeader {
            text: rest.to_string(),
        });
    }

    if let Some(item) = line.strip_prefix('-') {
        if let Some((label, value)) = item.split_once(':') {
            return Some(Fragment::LabeledItem {
                label: label.trim().to_string(),
                value: value.trim().to_string(),
            });
        }
        return Some(Fragment::BulletItem {
            text: item.trim().to_string(),
        });
    }

    Some(Fragment::Paragraph {
        text: line.to_string(),
    })
}

/// `"12. Title"` -> `Some("Title")`. Requires at least one digit before the dot.
fn strip_section_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.').map(str::trim_start)
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::SectionHeader { text } => write!(f, "{}", text),
            Fragment::LabeledItem { label, value } => write!(f, "    {}: {}", label, value),
            Fragment::BulletItem { text } => write!(f, "    • {}", text),
            Fragment::Paragraph { text } => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::DEFAULT_ANALYSIS;
    use pretty_assertions::assert_eq;

    fn header(text: &str) -> Fragment {
        Fragment::SectionHeader {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_numbered_line_is_section_header() {
        assert_eq!(
            format_line("1. Stone Identification:"),
            Some(header("Stone Identification:"))
        );
        assert_eq!(format_line("12.Uses"), Some(header("Uses")));
    }

    #[test]
    fn test_dash_with_colon_is_labeled_item() {
        assert_eq!(
            format_line("- Hardness: 6-7 on Mohs scale"),
            Some(Fragment::LabeledItem {
                label: "Hardness".to_string(),
                value: "6-7 on Mohs scale".to_string(),
            })
        );
    }

    #[test]
    fn test_labeled_item_splits_on_first_colon_only() {
        assert_eq!(
            format_line("- Ratio: 1:3 quartz"),
            Some(Fragment::LabeledItem {
                label: "Ratio".to_string(),
                value: "1:3 quartz".to_string(),
            })
        );
    }

    #[test]
    fn test_dash_without_colon_is_bullet() {
        assert_eq!(
            format_line("- Resistant to weathering"),
            Some(Fragment::BulletItem {
                text: "Resistant to weathering".to_string(),
            })
        );
    }

    #[test]
    fn test_plain_text_is_paragraph() {
        assert_eq!(
            format_line("  This looks like granite.  "),
            Some(Fragment::Paragraph {
                text: "This looks like granite.".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(format_line(""), None);
        assert_eq!(format_line("   \t "), None);
        assert_eq!(format_line("**"), None);
        assert!(format_analysis("\n\n  \n").is_empty());
    }

    #[test]
    fn test_markdown_decoration_is_stripped() {
        assert_eq!(
            format_line("**2. Physical Properties:**"),
            Some(header("Physical Properties:"))
        );
        assert_eq!(
            format_line("- **Density**: `2.7 g/cm³`"),
            Some(Fragment::LabeledItem {
                label: "Density".to_string(),
                value: "2.7 g/cm³".to_string(),
            })
        );
        assert_eq!(
            format_line("### Summary"),
            Some(Fragment::Paragraph {
                text: "Summary".to_string(),
            })
        );
    }

    #[test]
    fn test_leading_byte_order_mark_is_ignored() {
        assert_eq!(
            format_line("\u{feff}1. Stone Identification:"),
            Some(Fragment::SectionHeader {
                text: "Stone Identification:".to_string()
            })
        );
        assert_eq!(format_line("\u{feff}"), None);

        let fragments = format_analysis("\u{feff}- Name: Quartz\n");
        assert_eq!(
            fragments,
            vec![Fragment::LabeledItem {
                label: "Name".to_string(),
                value: "Quartz".to_string()
            }]
        );
    }

    #[test]
    fn test_digits_without_dot_are_not_headers() {
        assert_eq!(
            format_line("2023 survey results"),
            Some(Fragment::Paragraph {
                text: "2023 survey results".to_string(),
            })
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let fragments = format_analysis("Intro\n1. A:\n- x: y\n- z\nOutro");
        assert_eq!(
            fragments,
            vec![
                Fragment::Paragraph {
                    text: "Intro".to_string()
                },
                header("A:"),
                Fragment::LabeledItem {
                    label: "x".to_string(),
                    value: "y".to_string()
                },
                Fragment::BulletItem {
                    text: "z".to_string()
                },
                Fragment::Paragraph {
                    text: "Outro".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_formatting_is_deterministic() {
        assert_eq!(
            format_analysis(DEFAULT_ANALYSIS),
            format_analysis(DEFAULT_ANALYSIS)
        );
    }

    #[test]
    fn test_default_analysis_has_five_sections() {
        let headers: Vec<Fragment> = format_analysis(DEFAULT_ANALYSIS)
            .into_iter()
            .filter(|f| matches!(f, Fragment::SectionHeader { .. }))
            .collect();
        assert_eq!(
            headers,
            vec![
                header("Stone Identification:"),
                header("Physical Properties:"),
                header("Geological Significance:"),
                header("Historical & Practical Uses:"),
                header("Additional Information:"),
            ]
        );
    }

    #[test]
    fn test_fragment_display_and_json() {
        let item = Fragment::LabeledItem {
            label: "Name".to_string(),
            value: "Granite".to_string(),
        };
        assert_eq!(item.to_string(), "    Name: Granite");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "labeled_item");
        assert_eq!(json["label"], "Name");
    }
}

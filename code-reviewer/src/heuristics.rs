//! Deterministic heuristic analyzer for Python sources.
//!
//! Pure and total: any input yields (possibly empty) finding lists, never
//! an error. Findings come in two groups with a stable internal order:
//! **fixes** (defect-shaped, may carry a concrete replacement) and
//! **suggestions** (style-shaped). Offsets are zero-based line numbers
//! relative to the start of the analyzed text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::Finding;

/// Language tags routed to the Python analyzer.
pub fn is_python_tag(lang: &str) -> bool {
    matches!(lang, "py" | "python" | "py3")
}

lazy_static! {
    static ref BARE_EXCEPT: Regex = Regex::new(r"^\s*except\s*:").unwrap();
    static ref EQ_NONE: Regex = Regex::new(r"==\s*None\b").unwrap();
    static ref NE_NONE: Regex = Regex::new(r"!=\s*None\b").unwrap();
    static ref EVAL_CALL: Regex = Regex::new(r"\beval\s*\(").unwrap();
    static ref PRINT_CALL: Regex = Regex::new(r"^\s*print\s*\(").unwrap();
}

/// Longest line accepted before the style suggestion fires.
const MAX_LINE_CHARS: usize = 120;

/// Scan `source` line by line and collect `(fixes, suggestions)`.
pub fn analyze(source: &str) -> (Vec<Finding>, Vec<Finding>) {
    let mut fixes = Vec::new();
    let mut suggestions = Vec::new();

    for (offset, raw_line) in source.lines().enumerate() {
        let offset = offset as u32;
        // lines() keeps the \r of CRLF input; drop it so rules see the text
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if BARE_EXCEPT.is_match(line) {
            fixes.push(Finding {
                line_offset: offset,
                message: "Bare `except:` swallows every exception, including SystemExit."
                    .to_string(),
                suggestion: Some(line.replacen("except", "except Exception", 1)),
            });
        }

        if EQ_NONE.is_match(line) || NE_NONE.is_match(line) {
            let replaced = NE_NONE
                .replace_all(&EQ_NONE.replace_all(line, "is None"), "is not None")
                .into_owned();
            fixes.push(Finding {
                line_offset: offset,
                message: "Comparison with None should use `is` / `is not`.".to_string(),
                suggestion: Some(replaced),
            });
        }

        if EVAL_CALL.is_match(line) {
            fixes.push(Finding {
                line_offset: offset,
                message: "eval() executes arbitrary input; replace it with a safe alternative."
                    .to_string(),
                suggestion: None,
            });
        }

        if line.chars().count() > MAX_LINE_CHARS {
            suggestions.push(Finding {
                line_offset: offset,
                message: format!(
                    "Line exceeds {MAX_LINE_CHARS} characters ({}); consider wrapping.",
                    line.chars().count()
                ),
                suggestion: None,
            });
        }

        if line != line.trim_end() {
            suggestions.push(Finding {
                line_offset: offset,
                message: "Trailing whitespace.".to_string(),
                suggestion: Some(line.trim_end().to_string()),
            });
        }

        if PRINT_CALL.is_match(line) {
            suggestions.push(Finding {
                line_offset: offset,
                message: "Leftover print() call; prefer logging.".to_string(),
                suggestion: None,
            });
        }
    }

    (fixes, suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_tags() {
        assert!(is_python_tag("py"));
        assert!(is_python_tag("python"));
        assert!(is_python_tag("py3"));
        assert!(!is_python_tag("rs"));
        assert!(!is_python_tag("text"));
        assert!(!is_python_tag("Python"));
    }

    #[test]
    fn clean_source_has_no_findings() {
        let (fixes, sugs) = analyze("def f():\n    return 1\n");
        assert!(fixes.is_empty());
        assert!(sugs.is_empty());
    }

    #[test]
    fn bare_except_is_a_fix_with_replacement() {
        let src = "try:\n    pass\nexcept:\n    pass\n";
        let (fixes, _) = analyze(src);
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].line_offset, 2);
        assert_eq!(fixes[0].suggestion.as_deref(), Some("except Exception:"));
    }

    #[test]
    fn none_comparison_suggests_identity() {
        let (fixes, _) = analyze("if x == None:\n    pass\nif y != None:\n    pass\n");
        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].line_offset, 0);
        assert_eq!(fixes[0].suggestion.as_deref(), Some("if x is None:"));
        assert_eq!(fixes[1].line_offset, 2);
        assert_eq!(fixes[1].suggestion.as_deref(), Some("if y is not None:"));
    }

    #[test]
    fn eval_is_flagged_without_suggestion() {
        let (fixes, _) = analyze("x = eval(user_input)\n");
        assert_eq!(fixes.len(), 1);
        assert!(fixes[0].suggestion.is_none());
    }

    #[test]
    fn style_suggestions_fire_with_offsets() {
        let long = "x = 1  # ".to_string() + &"y".repeat(130);
        let src = format!("{long}\nz = 2   \nprint(z)\n");
        let (fixes, sugs) = analyze(&src);
        assert!(fixes.is_empty());
        assert_eq!(sugs.len(), 3);
        assert_eq!(sugs[0].line_offset, 0); // long line
        assert_eq!(sugs[1].line_offset, 1); // trailing whitespace
        assert_eq!(sugs[1].suggestion.as_deref(), Some("z = 2"));
        assert_eq!(sugs[2].line_offset, 2); // print
    }

    #[test]
    fn crlf_input_does_not_trip_trailing_whitespace() {
        let (_, sugs) = analyze("a = 1\r\nb = 2\r\n");
        assert!(sugs.is_empty());
    }
}

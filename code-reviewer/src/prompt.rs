//! Prompt builder for the review backend.
//!
//! Keep the prompt compact; the backend runs in JSON output mode, so the
//! instructions pin the exact reply shape instead of asking for prose.

/// Build the single review prompt sent to the generation backend.
///
/// Deterministic and pure. `excerpt` must already be truncated to the
/// configured character budget by the caller.
pub fn build_prompt(guidelines: &[String], path: &str, lang: &str, excerpt: &str) -> String {
    let mut s = String::new();
    s.push_str("You are a code review assistant. Review the code below.\n");
    s.push_str("Return ONLY JSON with this exact shape (no markdown, no code fences):\n");
    s.push_str(
        "{\"summary\": \"...\", \"comments\": [{\"lineOffset\": 0, \"message\": \"...\", \"suggestion\": \"...\"}]}\n",
    );
    s.push_str(
        "`lineOffset` is zero-based from the first line of the snippet; `suggestion` is an optional replacement for that line.\n",
    );
    s.push_str("Focus on correctness, potential bugs, readability, and performance.\n");

    if !guidelines.is_empty() {
        s.push_str("\n# Guidelines\n");
        for g in guidelines {
            s.push_str("- ");
            s.push_str(g);
            s.push('\n');
        }
    }

    s.push_str("\n# File\n");
    s.push_str(path);
    s.push_str(" (");
    s.push_str(lang);
    s.push_str(")\n");

    s.push_str("\n# Code\n```");
    s.push_str(lang);
    s.push('\n');
    s.push_str(excerpt);
    s.push_str("\n```\n");
    s
}

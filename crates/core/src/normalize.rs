//! Whitespace and emphasis-marker cleanup.
//!
//! Concatenating runs leaves doubled spaces, spaces before punctuation and
//! empty emphasis spans behind. Both functions here are pure and idempotent.

/// Literal rewrites applied on every pass of [`normalize_whitespace`].
const SPACING_FIXES: [(&str, &str); 9] = [
    ("  ", " "),
    (" \n", "\n"),
    ("\t\n", "\n"),
    (" .", "."),
    (" ,", ","),
    ("( ", "("),
    (" )", ")"),
    ("] [", "]["),
    ("] :", "]:"),
];

/// Collapse redundant spacing until the text stops changing.
///
/// Each pass applies [`SPACING_FIXES`] and drops one leading space or
/// newline. Every rewrite shortens the text, so the loop terminates.
pub fn normalize_whitespace(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let before = current.len();
        for (from, to) in SPACING_FIXES {
            if current.contains(from) {
                current = current.replace(from, to);
            }
        }
        if current.starts_with(' ') || current.starts_with('\n') {
            current.remove(0);
        }
        if current.len() == before {
            return current;
        }
    }
}

/// Normalize spacing, then remove emphasis artifacts.
///
/// `/ /` and `* *` join two adjacent spans of the same style into one; `//`
/// and `**` are spans with nothing inside them.
pub fn remove_redundancy(text: &str) -> String {
    let mut current = normalize_whitespace(text);
    loop {
        let next = normalize_whitespace(
            &current
                .replace("/ /", " ")
                .replace("* *", " ")
                .replace("//", "")
                .replace("**", ""),
        );
        if next == current {
            return current;
        }
        current = next;
    }
}

use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Clean up the text of a single run.
///
/// Applies NFC normalization, expands ligatures and drops replacement and NUL
/// characters. Surrounding whitespace is kept: the classifier reads it.
pub fn cleanup_run_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.nfc() {
        match ch {
            '\u{FFFD}' | '\0' => {}
            _ => match LIGATURES.iter().find(|(lig, _)| *lig == ch) {
                Some((_, expanded)) => result.push_str(expanded),
                None => result.push(ch),
            },
        }
    }

    result
}

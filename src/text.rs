//! Small text helpers for labels.

/// Uppercase the first character and leave the rest untouched.
///
/// ```rust
/// use covidash::text::capitalize;
///
/// assert_eq!(capitalize("delhi NCR"), "Delhi NCR");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-case every word.
///
/// A word starts at an ASCII letter, digit or underscore and runs until the
/// next whitespace. Its first character is uppercased and the rest
/// lowercased. Anything before a word start (punctuation, say) is copied
/// as is.
///
/// ```rust
/// use covidash::text::to_title_case;
///
/// assert_eq!(to_title_case("andaman and NICOBAR islands"), "Andaman And Nicobar Islands");
/// assert_eq!(to_title_case("(dadra)"), "(Dadra)");
/// ```
pub fn to_title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for ch in s.chars() {
        if ch.is_whitespace() {
            in_word = false;
            out.push(ch);
        } else if in_word {
            out.extend(ch.to_lowercase());
        } else if is_word_char(ch) {
            in_word = true;
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

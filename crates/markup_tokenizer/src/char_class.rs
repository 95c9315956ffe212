//! Unicode character-class predicates used while scanning names and markup.
//!
//! `is_name_start_char`/`is_name_char` implement XML 1.0 §2.3's
//! `NameStartChar`/`NameChar` productions (up to the historical U+FFFD
//! cutoff XML 1.0 Fifth Edition uses), which is also what HTML tag/attribute
//! names are scanned against here — this tokenizer is deliberately more
//! permissive than strict HTML5: it never rejects input that merely
//! violates strict XML.

/// Unicode whitespace, per `char::is_whitespace`.
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_letter(ch: char) -> bool {
    ch.is_alphabetic()
}

/// XML 1.0 `NameStartChar`.
pub fn is_name_start_char(ch: char) -> bool {
    matches!(ch,
        ':'
        | 'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// XML 1.0 `NameChar` (`NameStartChar` plus digits and the combining marks
/// the production adds).
pub fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch)
        || matches!(ch,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{0300}'..='\u{036F}'
            | '\u{203F}'..='\u{2040}'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_letters_are_name_start_chars() {
        assert!(is_name_start_char('a'));
        assert!(is_name_start_char('Z'));
        assert!(is_name_start_char('_'));
        assert!(is_name_start_char(':'));
    }

    #[test]
    fn digits_are_name_chars_but_not_name_start_chars() {
        assert!(!is_name_start_char('5'));
        assert!(is_name_char('5'));
    }

    #[test]
    fn hyphen_and_dot_are_name_chars_only() {
        assert!(!is_name_start_char('-'));
        assert!(is_name_char('-'));
        assert!(!is_name_start_char('.'));
        assert!(is_name_char('.'));
    }

    #[test]
    fn whitespace_is_not_a_name_char() {
        assert!(!is_name_char(' '));
        assert!(!is_name_char('\t'));
        assert!(!is_name_char('\n'));
    }

    #[test]
    fn rejects_angle_brackets_and_slash() {
        for ch in ['<', '>', '/', '='] {
            assert!(!is_name_start_char(ch));
            assert!(!is_name_char(ch));
        }
    }

    #[test]
    fn hex_digit_predicate_matches_ascii_hex() {
        assert!(is_hex_digit('a'));
        assert!(is_hex_digit('F'));
        assert!(is_hex_digit('9'));
        assert!(!is_hex_digit('g'));
    }
}

//! Character classes of the ASCII surface grammar.

pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const DOUBLE_QUOTE: char = '"';
pub const SLASH: char = '/';

/// Whitespace skipped between tokens. `\r` is included so CRLF files lex
/// the same as LF files.
#[inline]
pub fn is_white_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | LINE_FEED | CARRIAGE_RETURN)
}

/// Check if a character ends a line inside a string literal.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == LINE_FEED || ch == CARRIAGE_RETURN
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('Z'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('é'));
    }

    #[test]
    fn test_white_space() {
        assert!(is_white_space('\r'));
        assert!(!is_white_space('\u{00A0}'));
    }
}

//! Provides utilities for manipulating character values

/// Character which, in raw mode, is produced by the Enter key
pub const CARRIAGE_RETURN: char = '\r';

/// Line feed character; accepted as Enter when the terminal translates CR
pub const LINE_FEED: char = '\n';

/// Character which, in raw mode, is produced by the Backspace key on most terminals
pub const DELETE: char = '\x7f';

/// Character which begins an escape sequence
pub const ESCAPE: char = '\x1b';

/// Rubout character; produced by Backspace on some terminals (`Ctrl-H`)
pub const RUBOUT: char = '\x08';

/// Horizontal tab
pub const TAB: char = '\t';

/// Character inserted in place of input which is not valid UTF-8
pub const REPLACEMENT: char = '\u{fffd}';

/// Returns a character sequence escaped for user-facing display.
///
/// Escape is formatted as `^[`, control characters use caret notation.
pub fn escape_sequence(s: &str) -> String {
    let mut res = String::with_capacity(s.len());

    for ch in s.chars() {
        match ch {
            ESCAPE => res.push_str("^["),
            DELETE => res.push_str("^?"),
            ch if is_ctrl(ch) => {
                res.push('^');
                res.push(unctrl(ch));
            }
            ch => res.push(ch)
        }
    }

    res
}

/// Returns the control character corresponding to the given character.
///
/// ```
/// # use editline::chars::ctrl;
/// // Ctrl-C
/// assert_eq!(ctrl('c'), '\x03');
/// ```
#[inline]
pub fn ctrl(c: char) -> char {
    ((c as u8) & 0x1f) as char
}

/// Returns the printable character corresponding to the given control character.
///
/// ```
/// # use editline::chars::unctrl;
/// // Ctrl-D
/// assert_eq!(unctrl('\x04'), 'D');
/// ```
#[inline]
pub fn unctrl(c: char) -> char {
    ((c as u8) | 0x40) as char
}

/// Returns whether the character is a control character.
#[inline]
pub fn is_ctrl(c: char) -> bool {
    c < ' ' || c == DELETE
}

/// Returns whether the character is printable.
///
/// That is, not NUL, a C0 control character, DEL, or a C1 control character.
#[inline]
pub fn is_printable(c: char) -> bool {
    !(c < ' ' || ('\x7f'..='\u{9f}').contains(&c))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ctrl() {
        assert_eq!(ctrl('A'), '\x01');
        assert_eq!(ctrl('d'), '\x04');
        assert_eq!(unctrl('\x14'), 'T');
        assert!(is_ctrl('\x15'));
        assert!(is_ctrl(DELETE));
        assert!(!is_ctrl('x'));
    }

    #[test]
    fn test_printable() {
        assert!(is_printable('a'));
        assert!(is_printable('é'));
        assert!(is_printable('語'));
        assert!(!is_printable(ESCAPE));
        assert!(!is_printable('\u{85}'));
    }

    #[test]
    fn test_escape_sequence() {
        assert_eq!(escape_sequence("\x1b[3~"), "^[[3~");
        assert_eq!(escape_sequence("a\x03"), "a^C");
    }
}

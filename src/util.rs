//! Provides miscellaneous utilities

use unicode_width::UnicodeWidthChar;

/// Indicates the start of a series of invisible characters in the prompt
pub const START_INVISIBLE: char = '\x01';

/// Indicates the end of a series of invisible characters in the prompt
pub const END_INVISIBLE: char = '\x02';

/// Returns the number of terminal cells occupied by `ch`.
///
/// Combining marks and other zero-width characters occupy no cells;
/// East Asian wide characters occupy two.
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Returns whether `ch` occupies two terminal cells.
pub fn is_wide(ch: char) -> bool {
    char_width(ch) == 2
}

/// Removes the markers delimiting invisible prompt sequences, returning
/// the text as written to the terminal.
pub fn strip_markers(s: &str) -> String {
    s.chars().filter(|&ch| ch != START_INVISIBLE && ch != END_INVISIBLE).collect()
}

/// Returns only the visible portion of a prompt; that is, with any
/// `START_INVISIBLE` .. `END_INVISIBLE` sequences removed.
pub fn filter_visible(s: &str) -> String {
    let mut virt = String::new();
    let mut ignore = false;

    for ch in s.chars() {
        if ch == START_INVISIBLE {
            ignore = true;
        } else if ch == END_INVISIBLE {
            ignore = false;
        } else if !ignore {
            virt.push(ch);
        }
    }

    virt
}

/// Returns the index of the start of the whitespace-delimited word
/// preceding `cur`.
pub fn backward_word(buf: &[char], cur: usize) -> usize {
    let mut pos = cur;

    while pos > 0 && buf[pos - 1].is_whitespace() {
        pos -= 1;
    }
    while pos > 0 && !buf[pos - 1].is_whitespace() {
        pos -= 1;
    }

    pos
}

/// Returns the index of the end of the whitespace-delimited word
/// following `cur`.
pub fn forward_word(buf: &[char], cur: usize) -> usize {
    let mut pos = cur;

    while pos < buf.len() && buf[pos].is_whitespace() {
        pos += 1;
    }
    while pos < buf.len() && !buf[pos].is_whitespace() {
        pos += 1;
    }

    pos
}

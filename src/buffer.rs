//! Provides the editable line buffer and its screen rendering
//!
//! A `LineBuffer` holds the characters of the line being edited, the cursor
//! and the prompt which precedes them on screen. Each edit operation updates
//! the buffer and then repaints only the portion of the screen which changed.
//!
//! Positions reported by `pos` and `size` count the prompt, so that
//! `prompt_len() <= pos() <= size()` always holds.

use std::fmt;
use std::io;
use std::ops::Range;

use tracing::trace;

use crate::chars::is_printable;
use crate::error::{Error, Result};
use crate::terminal::{Terminal, TerminalWriter};
use crate::util::{
    backward_word, char_width, filter_visible, forward_word, is_wide,
    END_INVISIBLE, START_INVISIBLE,
};

/// Editable line of text, preceded on screen by a prompt
#[derive(Clone, Debug)]
pub struct LineBuffer {
    data: Vec<char>,
    cursor: usize,
    prompt: String,
    prompt_len: usize,
    columns: usize,
    max_len: usize,
}

impl LineBuffer {
    /// Creates an empty buffer seeded with `prompt`.
    ///
    /// `columns` is the width of the terminal. `capacity` characters are
    /// allocated up front; the line may never grow beyond `max_len`.
    pub fn new(prompt: &str, columns: usize, capacity: usize, max_len: usize) -> LineBuffer {
        let mut buf = LineBuffer{
            data: Vec::with_capacity(capacity),
            cursor: 0,
            prompt: String::new(),
            prompt_len: 0,
            columns: columns.max(1),
            max_len,
        };

        buf.set_prompt(prompt);
        buf
    }

    /// Returns the prompt string, including any invisible sequences.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Sets the prompt string. The screen is not updated.
    ///
    /// Text enclosed between `\x01` and `\x02` is written to the terminal
    /// but does not count toward the prompt width.
    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_owned();
        self.prompt_len = self.prompt_width();
    }

    fn prompt_width(&self) -> usize {
        let visible = filter_visible(&self.prompt).chars().collect::<Vec<_>>();
        self.display_size(&visible, 0)
    }

    /// Returns the number of screen cells occupied by the prompt.
    pub fn prompt_len(&self) -> usize {
        self.prompt_len
    }

    /// Returns the cursor position, counted from the start of the prompt.
    pub fn pos(&self) -> usize {
        self.prompt_len + self.cursor
    }

    /// Returns the logical size of the line, counted from the start of the prompt.
    pub fn size(&self) -> usize {
        self.prompt_len + self.data.len()
    }

    /// Returns the cursor index into the line content.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of characters in the line content.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the line content is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the line content.
    pub fn chars(&self) -> &[char] {
        &self.data
    }

    /// Returns the maximum number of characters in a line.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Returns the terminal width used to compute line wrapping.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Sets the terminal width. The screen is not updated; see `resize`.
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
        self.prompt_len = self.prompt_width();
    }

    /// Discards the line content without touching the screen.
    pub fn reset(&mut self) {
        self.data.clear();
        self.cursor = 0;
    }

    /// Inserts a character at the cursor.
    pub fn insert_rune<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>,
            ch: char) -> Result<()> {
        self.insert_runes(term, &[ch])
    }

    /// Inserts a sequence of characters at the cursor.
    ///
    /// If the line would grow beyond its maximum length, nothing is inserted
    /// and `Error::Capacity` is returned.
    pub fn insert_runes<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>,
            chars: &[char]) -> Result<()> {
        if chars.is_empty() {
            return Ok(());
        }

        if self.data.len() + chars.len() > self.max_len {
            return Err(Error::Capacity{max: self.max_len});
        }

        // Characters inserted before a combining mark change the cell
        // it combines with; redraw from the character before the cursor.
        let moves_combining = match self.data.get(self.cursor) {
            Some(&ch) => char_width(ch) == 0,
            None => false
        };

        let cursor = self.cursor;
        let _ = self.data.splice(cursor..cursor, chars.iter().cloned());

        if moves_combining && cursor != 0 {
            let (lines, cols) = self.move_delta(cursor, cursor - 1);
            self.move_rel(term, lines, cols)?;
            self.draw_buffer(term, cursor - 1)?;
        } else {
            self.draw_buffer(term, cursor)?;
        }

        self.cursor += chars.len();

        let len = self.data.len();
        self.move_from(term, len)?;
        Ok(())
    }

    /// Deletes the character before the cursor.
    pub fn delete_char_prev<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        if self.cursor != 0 {
            let cursor = self.cursor;
            self.delete_range(term, cursor - 1..cursor)?;
        }
        Ok(())
    }

    /// Deletes the character under the cursor.
    pub fn delete_char<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        if self.cursor != self.data.len() {
            let cursor = self.cursor;
            self.delete_range(term, cursor..cursor + 1)?;
        }
        Ok(())
    }

    /// Deletes from the cursor to the end of the line.
    pub fn delete_to_right<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        if self.cursor != self.data.len() {
            let range = self.cursor..self.data.len();
            self.delete_range(term, range)?;
        }
        Ok(())
    }

    /// Deletes the whole line, leaving only the prompt.
    pub fn delete_line<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        let range = 0..self.data.len();
        self.delete_range(term, range)
    }

    /// Deletes a range of the line; the cursor is left at the start of the range.
    fn delete_range<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>,
            range: Range<usize>) -> Result<()> {
        let start = range.start;

        self.move_to(term, start)?;

        let _ = self.data.drain(range);

        self.draw_buffer(term, start)?;
        term.clear_to_screen_end()?;
        let len = self.data.len();
        self.move_from(term, len)?;

        Ok(())
    }

    /// Transposes the character before the cursor with the character under it,
    /// then advances the cursor.
    ///
    /// At the end of the line, the final two characters are transposed.
    /// Does nothing at the start of the line or if the line has fewer than
    /// two characters.
    pub fn swap<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        let len = self.data.len();

        if self.cursor == 0 || len < 2 {
            return Ok(());
        }

        let (left, final_cur) = if self.cursor == len {
            (len - 2, len)
        } else {
            (self.cursor - 1, self.cursor + 1)
        };

        self.move_to(term, left)?;
        self.data.swap(left, left + 1);

        self.draw_buffer(term, left)?;
        term.clear_to_screen_end()?;

        self.cursor = final_cur;
        self.move_from(term, len)?;
        Ok(())
    }

    /// Moves the cursor one character left.
    ///
    /// Returns `false` if the cursor was already at the start of the line.
    pub fn backward<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }

        let pos = self.cursor - 1;
        self.move_to(term, pos)?;
        Ok(true)
    }

    /// Moves the cursor one character right.
    ///
    /// Returns `false` if the cursor was already at the end of the line.
    pub fn forward<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<bool> {
        if self.cursor == self.data.len() {
            return Ok(false);
        }

        let pos = self.cursor + 1;
        self.move_to(term, pos)?;
        Ok(true)
    }

    /// Moves the cursor to the start of the previous whitespace-delimited word.
    pub fn word_backward<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        let pos = backward_word(&self.data, self.cursor);
        self.move_to(term, pos)?;
        Ok(())
    }

    /// Moves the cursor to the end of the next whitespace-delimited word.
    pub fn word_forward<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        let pos = forward_word(&self.data, self.cursor);
        self.move_to(term, pos)?;
        Ok(())
    }

    /// Moves the cursor to the start of the line.
    pub fn start<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        self.move_to(term, 0)?;
        Ok(())
    }

    /// Moves the cursor to the end of the line.
    ///
    /// Returns `false` if the cursor was already at the end of the line.
    pub fn end<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<bool> {
        let len = self.data.len();

        if self.cursor == len {
            return Ok(false);
        }

        self.move_to(term, len)?;
        Ok(true)
    }

    /// Replaces the line content, leaving the cursor at the end.
    ///
    /// Content beyond the maximum line length is dropped.
    pub fn set_contents<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>,
            s: &str) -> Result<()> {
        self.move_to(term, 0)?;

        self.data.clear();
        self.data.extend(s.chars().take(self.max_len));

        self.draw_buffer(term, 0)?;
        self.cursor = self.data.len();
        term.clear_to_screen_end()?;

        Ok(())
    }

    /// Draws the prompt and the line, beginning on the current terminal line.
    pub fn draw_prompt<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        term.move_to_first_column()?;
        term.clear_to_screen_end()?;

        let prompt = self.prompt.chars().collect::<Vec<_>>();
        self.draw_text(term, 0, &prompt, true)?;
        self.draw_buffer(term, 0)?;

        let len = self.data.len();
        self.move_from(term, len)?;
        Ok(())
    }

    /// Repaints the prompt and the whole line in place.
    pub fn refresh<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>)
            -> Result<()> {
        let (line, _) = self.line_col(self.cursor);
        term.move_up(line)?;
        self.draw_prompt(term)
    }

    /// Adopts a new terminal width and repaints the prompt and line.
    pub fn resize<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>,
            columns: usize) -> Result<()> {
        let (line, _) = self.line_col(self.cursor);
        trace!(old = self.columns, new = columns, "resizing line buffer");

        term.move_up(line)?;
        self.set_columns(columns);
        self.draw_prompt(term)
    }

    /// Draws the line content beginning at index `pos`.
    ///
    /// The terminal cursor is assumed to be at the screen cell of `pos`;
    /// it is left at the end of the line.
    fn draw_buffer<Term: Terminal>(&self, term: &mut dyn TerminalWriter<Term>,
            pos: usize) -> io::Result<()> {
        let (_, col) = self.line_col(pos);
        self.draw_text(term, col, &self.data[pos..], false)
    }

    fn draw_text<Term: Terminal>(&self, term: &mut dyn TerminalWriter<Term>,
            start_col: usize, text: &[char], handle_invisible: bool) -> io::Result<()> {
        let width = self.columns;
        let mut col = start_col % width;
        let mut out = String::with_capacity(text.len());

        let mut hidden = false;

        for &ch in text {
            if handle_invisible && ch == START_INVISIBLE {
                hidden = true;
            } else if handle_invisible && ch == END_INVISIBLE {
                hidden = false;
            } else if hidden {
                // Written, but occupies no cells
                out.push(ch);
            } else if !is_printable(ch) {
                continue;
            } else if char_width(ch) == 0 {
                out.push(ch);
            } else if is_wide(ch) {
                if width == 1 {
                    continue;
                } else if col == width - 1 {
                    out.push_str("  \r");
                    out.push(ch);
                    col = 2;
                } else {
                    out.push(ch);
                    col += 2;
                }
            } else {
                out.push(ch);
                col += 1;
            }

            if col == width {
                // Space pushes the cursor to the next line,
                // CR brings back to the start of the line.
                out.push_str(" \r");
                col = 0;
            }
        }

        term.write(&out)
    }

    /// Returns the number of cells occupied by `text` drawn from `start_col`.
    fn display_size(&self, text: &[char], start_col: usize) -> usize {
        let width = self.columns;
        let mut col = start_col;

        for &ch in text {
            let n = if !is_printable(ch) {
                0
            } else if is_wide(ch) {
                if width == 1 {
                    0
                } else if col % width == width - 1 {
                    // Can't render a fullwidth character into last column
                    3
                } else {
                    2
                }
            } else {
                char_width(ch)
            };

            col += n;
        }

        col - start_col
    }

    /// Returns the screen `(line, column)` of index `pos`, relative to
    /// the first line of the prompt.
    fn line_col(&self, pos: usize) -> (usize, usize) {
        let width = self.columns;
        let n = self.prompt_len + self.display_size(&self.data[..pos], self.prompt_len);

        (n / width, n % width)
    }

    /// Moves the terminal cursor from index `pos` to the buffer cursor.
    fn move_from<Term: Terminal>(&self, term: &mut dyn TerminalWriter<Term>,
            pos: usize) -> io::Result<()> {
        let (lines, cols) = self.move_delta(pos, self.cursor);
        self.move_rel(term, lines, cols)
    }

    /// Moves the buffer cursor, and the terminal cursor with it, to index `pos`.
    fn move_to<Term: Terminal>(&mut self, term: &mut dyn TerminalWriter<Term>,
            pos: usize) -> io::Result<()> {
        if pos != self.cursor {
            let (lines, cols) = self.move_delta(self.cursor, pos);
            self.move_rel(term, lines, cols)?;
            self.cursor = pos;
        }

        Ok(())
    }

    fn move_delta(&self, old: usize, new: usize) -> (isize, isize) {
        let (old_line, old_col) = self.line_col(old);
        let (new_line, new_col) = self.line_col(new);

        (new_line as isize - old_line as isize,
         new_col as isize - old_col as isize)
    }

    fn move_rel<Term: Terminal>(&self, term: &mut dyn TerminalWriter<Term>,
            lines: isize, cols: isize) -> io::Result<()> {
        if lines > 0 {
            term.move_down(lines as usize)?;
        } else if lines < 0 {
            term.move_up((-lines) as usize)?;
        }

        if cols > 0 {
            term.move_right(cols as usize)?;
        } else if cols < 0 {
            term.move_left((-cols) as usize)?;
        }

        Ok(())
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &ch in &self.data {
            fmt::Write::write_char(f, ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rand::{thread_rng, Rng};

    use super::LineBuffer;
    use crate::error::Error;
    use crate::memory::MemoryTerminal;
    use crate::terminal::{Size, Terminal};

    fn term(lines: usize, columns: usize) -> MemoryTerminal {
        MemoryTerminal::with_size(Size{lines, columns})
    }

    fn assert_lines(mem: &MemoryTerminal, tests: &[&str]) {
        let lines = mem.lines();
        let expected = tests.iter().map(|s| s.trim_end()).collect::<Vec<_>>();
        assert_eq!(lines, expected);
    }

    fn insert_str(buf: &mut LineBuffer, mem: &MemoryTerminal, s: &str) {
        let mut w = mem.lock_write();
        let chars = s.chars().collect::<Vec<_>>();
        buf.insert_runes(&mut *w, &chars).unwrap();
    }

    fn prompted(mem: &MemoryTerminal, prompt: &str) -> LineBuffer {
        let mut buf = LineBuffer::new(prompt, mem.size().columns, 16, 64);
        buf.draw_prompt(&mut *mem.lock_write()).unwrap();
        buf
    }

    #[test]
    fn test_backspace_positions() {
        let mem = term(3, 20);
        let mut buf = prompted(&mem, "$ ");

        insert_str(&mut buf, &mem, "abc");
        buf.delete_char_prev(&mut *mem.lock_write()).unwrap();

        assert_eq!(buf.to_string(), "ab");
        assert_eq!(buf.prompt_len(), 2);
        assert_eq!(buf.pos(), 4);
        assert_eq!(buf.size(), 4);
        assert_lines(&mem, &["$ ab", "", ""]);
        assert_eq!(mem.cursor(), (0, 4));
    }

    #[test]
    fn test_insert_middle() {
        let mem = term(3, 20);
        let mut buf = prompted(&mem, "> ");

        insert_str(&mut buf, &mem, "hld");
        {
            let mut w = mem.lock_write();
            buf.backward(&mut *w).unwrap();
            buf.backward(&mut *w).unwrap();

            for ch in "ello wor".chars() {
                buf.insert_rune(&mut *w, ch).unwrap();
            }
        }

        assert_eq!(buf.to_string(), "hello world");
        assert_eq!(buf.cursor(), 9);
        assert_lines(&mem, &["> hello world", "", ""]);
        assert_eq!(mem.cursor(), (0, 11));
    }

    #[test]
    fn test_wrap() {
        let mem = term(4, 8);
        let mut buf = prompted(&mem, "$ ");

        insert_str(&mut buf, &mem, "abcdef");
        assert_lines(&mem, &["$ abcdef", "", "", ""]);
        assert_eq!(mem.cursor(), (1, 0));

        insert_str(&mut buf, &mem, "ghij");
        assert_lines(&mem, &["$ abcdef", "ghij", "", ""]);
        assert_eq!(mem.cursor(), (1, 4));

        {
            let mut w = mem.lock_write();
            buf.start(&mut *w).unwrap();
        }
        assert_eq!(mem.cursor(), (0, 2));

        {
            let mut w = mem.lock_write();
            buf.delete_char(&mut *w).unwrap();
        }
        assert_lines(&mem, &["$ bcdefg", "hij", "", ""]);
        assert_eq!(mem.cursor(), (0, 2));

        {
            let mut w = mem.lock_write();
            buf.end(&mut *w).unwrap();
        }
        assert_eq!(mem.cursor(), (1, 3));
    }

    #[test]
    fn test_wide_chars() {
        let mut buf = LineBuffer::new("$ ", 6, 4, 16);

        buf.data = "語a語".chars().collect();
        buf.cursor = 3;

        assert_eq!(buf.line_col(1), (0, 4));
        assert_eq!(buf.line_col(2), (0, 5));
        // Skips the final column of the first line
        assert_eq!(buf.line_col(3), (1, 2));

        buf.data = "e\u{301}x".chars().collect();
        assert_eq!(buf.line_col(2), (0, 3));
        assert_eq!(buf.line_col(3), (0, 4));
    }

    #[test]
    fn test_delete_boundaries() {
        let mem = term(3, 20);
        let mut buf = prompted(&mem, "$ ");
        let mut w = mem.lock_write();

        buf.delete_char_prev(&mut *w).unwrap();
        buf.delete_char(&mut *w).unwrap();
        assert_eq!(buf.pos(), buf.prompt_len());

        let chars = "one two".chars().collect::<Vec<_>>();
        buf.insert_runes(&mut *w, &chars).unwrap();
        buf.delete_char(&mut *w).unwrap();
        assert_eq!(buf.to_string(), "one two");

        buf.word_backward(&mut *w).unwrap();
        buf.delete_to_right(&mut *w).unwrap();
        drop(w);

        assert_eq!(buf.to_string(), "one ");
        assert_lines(&mem, &["$ one", "", ""]);
    }

    #[test]
    fn test_delete_line() {
        let mem = term(3, 8);
        let mut buf = prompted(&mem, "$ ");

        insert_str(&mut buf, &mem, "hello world");
        buf.delete_line(&mut *mem.lock_write()).unwrap();

        assert!(buf.is_empty());
        assert_eq!(buf.size(), buf.prompt_len());
        assert_lines(&mem, &["$", "", ""]);
        assert_eq!(mem.cursor(), (0, 2));
    }

    #[test]
    fn test_swap() {
        let mem = term(3, 20);
        let mut buf = prompted(&mem, "$ ");

        insert_str(&mut buf, &mem, "abcd");
        {
            let mut w = mem.lock_write();
            buf.swap(&mut *w).unwrap();
        }
        assert_eq!(buf.to_string(), "abdc");
        assert_eq!(buf.cursor(), 4);

        {
            let mut w = mem.lock_write();
            buf.start(&mut *w).unwrap();
            buf.swap(&mut *w).unwrap();
            assert_eq!(buf.to_string(), "abdc");

            buf.forward(&mut *w).unwrap();
            buf.swap(&mut *w).unwrap();
        }
        assert_eq!(buf.to_string(), "badc");
        assert_eq!(buf.cursor(), 2);
        assert_lines(&mem, &["$ badc", "", ""]);
        assert_eq!(mem.cursor(), (0, 4));
    }

    #[test]
    fn test_words() {
        let mem = term(3, 30);
        let mut buf = prompted(&mem, "$ ");

        insert_str(&mut buf, &mem, "alpha  beta gamma");
        let mut w = mem.lock_write();

        buf.word_backward(&mut *w).unwrap();
        assert_eq!(buf.cursor(), 12);
        buf.word_backward(&mut *w).unwrap();
        assert_eq!(buf.cursor(), 7);
        buf.word_backward(&mut *w).unwrap();
        assert_eq!(buf.cursor(), 0);
        buf.word_forward(&mut *w).unwrap();
        assert_eq!(buf.cursor(), 5);
        buf.word_forward(&mut *w).unwrap();
        assert_eq!(buf.cursor(), 11);
        drop(w);

        assert_eq!(mem.cursor(), (0, 13));
    }

    #[test]
    fn test_backward_idempotent() {
        let mem = term(3, 20);
        let mut buf = prompted(&mem, "$ ");
        let mut w = mem.lock_write();

        for _ in 0..5 {
            assert_eq!(buf.backward(&mut *w).unwrap(), false);
            assert_eq!(buf.pos(), 2);
        }
        assert_eq!(buf.forward(&mut *w).unwrap(), false);
    }

    #[test]
    fn test_capacity() {
        let mem = term(3, 20);
        let mut buf = LineBuffer::new("$ ", 20, 2, 4);
        let mut w = mem.lock_write();

        buf.insert_runes(&mut *w, &['a', 'b', 'c']).unwrap();
        assert_matches!(buf.insert_runes(&mut *w, &['d', 'e']),
            Err(Error::Capacity{max: 4}));
        assert_eq!(buf.to_string(), "abc");

        buf.insert_rune(&mut *w, 'd').unwrap();
        assert_matches!(buf.insert_rune(&mut *w, 'e'), Err(Error::Capacity{..}));
        assert_eq!(buf.to_string(), "abcd");
    }

    #[test]
    fn test_invisible_prompt() {
        let mem = term(3, 20);
        let mut buf = prompted(&mem, "\x01\x1b[1m\x02>>\x01\x1b[0m\x02 ");

        assert_eq!(buf.prompt_len(), 3);
        insert_str(&mut buf, &mem, "x");
        assert_eq!(buf.pos(), 4);
    }

    #[test]
    fn test_set_contents_and_refresh() {
        let mem = term(4, 10);
        let mut buf = prompted(&mem, "$ ");

        insert_str(&mut buf, &mem, "a long line here");
        buf.set_contents(&mut *mem.lock_write(), "short").unwrap();
        assert_lines(&mem, &["$ short", "", "", ""]);
        assert_eq!(buf.cursor(), 5);

        {
            let mut w = mem.lock_write();
            buf.backward(&mut *w).unwrap();
            buf.refresh(&mut *w).unwrap();
        }
        assert_lines(&mem, &["$ short", "", "", ""]);
        assert_eq!(mem.cursor(), (0, 6));
    }

    #[test]
    fn test_resize() {
        let mem = term(4, 10);
        let mut buf = prompted(&mem, "$ ");

        insert_str(&mut buf, &mem, "0123456789");
        assert_lines(&mem, &["$ 01234567", "89", "", ""]);

        mem.resize(Size{lines: 4, columns: 20});
        buf.resize(&mut *mem.lock_write(), 20).unwrap();
        assert_lines(&mem, &["$ 0123456789", "", "", ""]);
        assert_eq!(mem.cursor(), (0, 12));
    }

    #[test]
    fn test_random_edits() {
        let mem = term(10, 12);
        let mut buf = prompted(&mem, "$ ");
        let mut rng = thread_rng();
        let mut expected_len = 0;

        let mut w = mem.lock_write();

        for _ in 0..500 {
            match rng.gen_range(0, 8) {
                0 | 1 | 2 => {
                    if buf.insert_rune(&mut *w, 'x').is_ok() {
                        expected_len += 1;
                    }
                }
                3 => {
                    if buf.cursor() != 0 {
                        expected_len -= 1;
                    }
                    buf.delete_char_prev(&mut *w).unwrap();
                }
                4 => {
                    if buf.cursor() != buf.len() {
                        expected_len -= 1;
                    }
                    buf.delete_char(&mut *w).unwrap();
                }
                5 => { buf.backward(&mut *w).unwrap(); }
                6 => { buf.forward(&mut *w).unwrap(); }
                _ => buf.swap(&mut *w).unwrap(),
            }

            assert!(buf.prompt_len() <= buf.pos());
            assert!(buf.pos() <= buf.size());
            assert_eq!(buf.size(), buf.prompt_len() + expected_len);
        }
    }
}

//! Decodes raw terminal input into editing commands
//!
//! `Decoder` is a byte-at-a-time state machine. Printable input is assembled
//! from UTF-8 and reported as `Command::Insert`; control characters and ANSI
//! escape sequences are mapped onto a fixed set of editing commands.
//! Escape sequences which are not recognized are consumed and discarded.

use std::fmt;
use std::str::from_utf8;

use tracing::{debug, trace};

use crate::chars::{
    ctrl, escape_sequence, is_printable,
    CARRIAGE_RETURN, DELETE, ESCAPE, LINE_FEED, REPLACEMENT, RUBOUT,
};

/// Maximum number of parameter and intermediate bytes held for one sequence
const MAX_SEQUENCE: usize = 8;

/// Editing command decoded from terminal input
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Insert a character at the cursor
    Insert(char),
    /// Submit the line
    AcceptLine,
    /// Delete the character before the cursor
    BackwardDeleteChar,
    /// Delete the character under the cursor
    DeleteChar,
    /// Abandon the line and start over
    Interrupt,
    /// End input
    EndOfFile,
    /// Transpose the characters around the cursor
    TransposeChars,
    /// Delete the whole line
    DeleteLine,
    /// Clear the screen and redraw the prompt
    ClearScreen,
    /// Delete from the cursor to the end of the line
    KillToEnd,
    /// Move to the start of the line
    BeginningOfLine,
    /// Move to the end of the line
    EndOfLine,
    /// Move one character left
    BackwardChar,
    /// Move one character right
    ForwardChar,
    /// Recall the previous history entry
    PreviousHistory,
    /// Recall the next history entry
    NextHistory,
    /// Move to the start of the previous word
    BackwardWord,
    /// Move to the end of the next word
    ForwardWord,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Command::Insert(ch) => write!(f, "insert({:?})", ch),
            ref cmd => fmt::Debug::fmt(cmd, f)
        }
    }
}

/// Returns the command bound to a control character, if any.
pub fn control_command(ch: char) -> Option<Command> {
    use self::Command::*;

    let cmd = match ch {
        CARRIAGE_RETURN | LINE_FEED => AcceptLine,
        DELETE | RUBOUT => BackwardDeleteChar,
        ch if ch == ctrl('a') => BeginningOfLine,
        ch if ch == ctrl('b') => BackwardChar,
        ch if ch == ctrl('c') => Interrupt,
        ch if ch == ctrl('d') => EndOfFile,
        ch if ch == ctrl('e') => EndOfLine,
        ch if ch == ctrl('f') => ForwardChar,
        ch if ch == ctrl('k') => KillToEnd,
        ch if ch == ctrl('l') => ClearScreen,
        ch if ch == ctrl('n') => NextHistory,
        ch if ch == ctrl('p') => PreviousHistory,
        ch if ch == ctrl('t') => TransposeChars,
        ch if ch == ctrl('u') => DeleteLine,
        _ => return None
    };

    Some(cmd)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Normal,
    /// `ESC` received
    Escape,
    /// `ESC [` or `ESC O` received
    Csi,
    /// Parameter or intermediate bytes received after `ESC [`
    ExtendedCsi,
}

/// Decodes terminal input bytes into `Command` values
#[derive(Clone, Debug)]
pub struct Decoder {
    state: State,
    /// `[` or `O`
    introducer: u8,
    seq: [u8; MAX_SEQUENCE],
    seq_len: usize,
    overflow: bool,
    utf8: [u8; 4],
    utf8_len: usize,
    utf8_need: usize,
    /// Continuation bytes of a discarded character still to be skipped
    skip: usize,
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::new()
    }
}

impl Decoder {
    /// Returns a new `Decoder` in its initial state.
    pub fn new() -> Decoder {
        Decoder{
            state: State::Normal,
            introducer: 0,
            seq: [0; MAX_SEQUENCE],
            seq_len: 0,
            overflow: false,
            utf8: [0; 4],
            utf8_len: 0,
            utf8_need: 0,
            skip: 0,
        }
    }

    /// Returns whether an escape sequence or a multi-byte character
    /// has been partially received.
    pub fn is_pending(&self) -> bool {
        self.state != State::Normal || self.utf8_len != 0 || self.skip != 0
    }

    /// Discards any partially received input.
    pub fn reset(&mut self) {
        self.state = State::Normal;
        self.seq_len = 0;
        self.overflow = false;
        self.utf8_len = 0;
        self.utf8_need = 0;
        self.skip = 0;
    }

    /// Decodes a series of bytes, returning the commands they complete.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<Command> {
        let mut out = Vec::new();

        for &b in bytes {
            self.push(b, &mut out);
        }

        out
    }

    /// Decodes a single byte, appending any completed command to `out`.
    pub fn push(&mut self, byte: u8, out: &mut Vec<Command>) {
        if self.skip != 0 {
            if is_continuation(byte) {
                self.skip -= 1;
                return;
            }
            self.skip = 0;
        }

        if self.utf8_need != 0 {
            if is_continuation(byte) {
                self.utf8[self.utf8_len] = byte;
                self.utf8_len += 1;

                if self.utf8_len == self.utf8_need {
                    let ch = self.finish_utf8();
                    self.normal_char(ch, out);
                }
                return;
            }

            trace!("truncated UTF-8 sequence");
            self.utf8_len = 0;
            self.utf8_need = 0;
            out.push(Command::Insert(REPLACEMENT));
        }

        match self.state {
            State::Normal => self.normal(byte, out),
            State::Escape => self.escape(byte, out),
            State::Csi => self.csi(byte, out),
            State::ExtendedCsi => self.extended_csi(byte, out),
        }
    }

    fn normal(&mut self, byte: u8, out: &mut Vec<Command>) {
        match byte {
            0x00..=0x7f => self.normal_char(byte as char, out),
            _ => match utf8_len(byte) {
                Some(n) => {
                    self.utf8[0] = byte;
                    self.utf8_len = 1;
                    self.utf8_need = n;
                }
                None => {
                    trace!(byte, "invalid UTF-8 byte");
                    out.push(Command::Insert(REPLACEMENT));
                }
            }
        }
    }

    fn normal_char(&mut self, ch: char, out: &mut Vec<Command>) {
        if ch == ESCAPE {
            self.begin_sequence();
        } else if let Some(cmd) = control_command(ch) {
            out.push(cmd);
        } else if is_printable(ch) {
            out.push(Command::Insert(ch));
        } else {
            trace!(ch = %escape_sequence(&ch.to_string()), "ignoring control character");
        }
    }

    fn escape(&mut self, byte: u8, out: &mut Vec<Command>) {
        match byte {
            b'[' | b'O' => {
                self.introducer = byte;
                self.state = State::Csi;
            }
            _ => {
                self.seq_len = 0;
                self.push_seq(byte);
                self.discard();
                self.after_abort(byte, out);
            }
        }
    }

    fn csi(&mut self, byte: u8, out: &mut Vec<Command>) {
        match byte {
            0x20..=0x3f => {
                self.push_seq(byte);
                self.state = State::ExtendedCsi;
            }
            0x40..=0x7e => {
                self.state = State::Normal;

                let cmd = match byte {
                    b'A' => Some(Command::PreviousHistory),
                    b'B' => Some(Command::NextHistory),
                    b'C' => Some(Command::ForwardChar),
                    b'D' => Some(Command::BackwardChar),
                    b'H' => Some(Command::BeginningOfLine),
                    b'F' => Some(Command::EndOfLine),
                    _ => None
                };

                match cmd {
                    Some(cmd) => out.push(cmd),
                    None => {
                        self.push_seq(byte);
                        self.discard();
                    }
                }
            }
            _ => {
                self.discard();
                self.after_abort(byte, out);
            }
        }
    }

    fn extended_csi(&mut self, byte: u8, out: &mut Vec<Command>) {
        match byte {
            0x20..=0x3f => self.push_seq(byte),
            0x40..=0x7e => {
                self.state = State::Normal;

                match self.extended_command(byte) {
                    Some(cmd) => {
                        self.seq_len = 0;
                        out.push(cmd);
                    }
                    None => {
                        self.push_seq(byte);
                        self.discard();
                    }
                }
            }
            _ => {
                self.discard();
                self.after_abort(byte, out);
            }
        }
    }

    fn extended_command(&self, last: u8) -> Option<Command> {
        if self.overflow || self.introducer != b'[' {
            return None;
        }

        match (&self.seq[..self.seq_len], last) {
            (b"3", b'~') => Some(Command::DeleteChar),
            (b"1", b'~') | (b"7", b'~') => Some(Command::BeginningOfLine),
            (b"4", b'~') | (b"8", b'~') => Some(Command::EndOfLine),
            (b"1;5", b'D') => Some(Command::BackwardWord),
            (b"1;5", b'C') => Some(Command::ForwardWord),
            _ => None
        }
    }

    fn begin_sequence(&mut self) {
        self.state = State::Escape;
        self.introducer = 0;
        self.seq_len = 0;
        self.overflow = false;
    }

    fn push_seq(&mut self, byte: u8) {
        if self.seq_len == MAX_SEQUENCE {
            self.overflow = true;
        } else {
            self.seq[self.seq_len] = byte;
            self.seq_len += 1;
        }
    }

    fn discard(&mut self) {
        let mut seq = String::from("\x1b");

        if self.introducer != 0 {
            seq.push(self.introducer as char);
        }
        seq.push_str(&String::from_utf8_lossy(&self.seq[..self.seq_len]));

        debug!(sequence = %escape_sequence(&seq), overflow = self.overflow,
            "discarding unrecognized escape sequence");

        self.state = State::Normal;
        self.seq_len = 0;
        self.overflow = false;
    }

    // A control character or escape interrupting a sequence is not part of it.
    // A multi-byte character is discarded along with the sequence.
    fn after_abort(&mut self, byte: u8, out: &mut Vec<Command>) {
        if byte < 0x20 {
            self.normal(byte, out);
        } else if let Some(n) = utf8_len(byte) {
            self.skip = n - 1;
        }
    }

    fn finish_utf8(&mut self) -> char {
        let ch = from_utf8(&self.utf8[..self.utf8_len]).ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(REPLACEMENT);

        self.utf8_len = 0;
        self.utf8_need = 0;
        ch
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xc0 == 0x80
}

/// Returns the length of a UTF-8 sequence beginning with `lead`.
fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Command, Decoder};
    use super::Command::*;
    use crate::chars::REPLACEMENT;

    fn decode(bytes: &[u8]) -> Vec<Command> {
        Decoder::new().decode(bytes)
    }

    #[test]
    fn test_printable() {
        assert_eq!(decode(b"a B"), [Insert('a'), Insert(' '), Insert('B')]);
    }

    #[test]
    fn test_control_table() {
        assert_eq!(decode(b"\r\n"), [AcceptLine, AcceptLine]);
        assert_eq!(decode(b"\x7f\x08"), [BackwardDeleteChar, BackwardDeleteChar]);
        assert_eq!(decode(b"\x03\x04"), [Interrupt, EndOfFile]);
        assert_eq!(decode(b"\x14\x15\x0c\x0b"),
            [TransposeChars, DeleteLine, ClearScreen, KillToEnd]);
        assert_eq!(decode(b"\x01\x05\x02\x06"),
            [BeginningOfLine, EndOfLine, BackwardChar, ForwardChar]);
        assert_eq!(decode(b"\x10\x0e"), [PreviousHistory, NextHistory]);
    }

    #[test]
    fn test_ignored_controls() {
        assert_eq!(decode(b"\tx\x07\x00"), [Insert('x')]);
    }

    #[test]
    fn test_arrows() {
        assert_eq!(decode(b"\x1b[D"), [BackwardChar]);
        assert_eq!(decode(b"\x1b[C\x1b[A\x1b[B"),
            [ForwardChar, PreviousHistory, NextHistory]);
    }

    #[test]
    fn test_home_end() {
        assert_eq!(decode(b"\x1bOH\x1bOF"), [BeginningOfLine, EndOfLine]);
        assert_eq!(decode(b"\x1b[H\x1b[F"), [BeginningOfLine, EndOfLine]);
        assert_eq!(decode(b"\x1b[1~\x1b[4~\x1b[7~\x1b[8~"),
            [BeginningOfLine, EndOfLine, BeginningOfLine, EndOfLine]);
    }

    #[test]
    fn test_extended() {
        assert_eq!(decode(b"\x1b[3~"), [DeleteChar]);
        assert_eq!(decode(b"\x1b[1;5D\x1b[1;5C"), [BackwardWord, ForwardWord]);
    }

    #[test]
    fn test_unrecognized_discarded() {
        assert_eq!(decode(b"\x1b[2~a"), [Insert('a')]);
        assert_eq!(decode(b"\x1b[5;3Zb"), [Insert('b')]);
        assert_eq!(decode(b"\x1bxc"), [Insert('c')]);
        assert_eq!(decode(b"\x1bO3~d"), [Insert('d')]);
        assert_eq!(decode(b"\x1b[1;2;3;4;5;6;7;8;9mx"), [Insert('x')]);
    }

    #[test]
    fn test_interrupted_sequence() {
        assert_eq!(decode(b"\x1b[1\x03"), [Interrupt]);
        assert_eq!(decode(b"\x1b\x1b[D"), [BackwardChar]);
    }

    #[test]
    fn test_split_input() {
        let mut dec = Decoder::new();

        assert!(dec.decode(b"\x1b").is_empty());
        assert!(dec.is_pending());
        assert!(dec.decode(b"[1;").is_empty());
        assert_eq!(dec.decode(b"5C"), [ForwardWord]);
        assert!(!dec.is_pending());

        let bytes = "é語".as_bytes();
        assert!(dec.decode(&bytes[..1]).is_empty());
        assert_eq!(dec.decode(&bytes[1..3]), [Insert('é')]);
        assert_eq!(dec.decode(&bytes[3..]), [Insert('語')]);
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(decode(b"\xffa"), [Insert(REPLACEMENT), Insert('a')]);
        assert_eq!(decode(b"\xc3a"), [Insert(REPLACEMENT), Insert('a')]);
        assert_eq!(decode(b"\xe0\x80\x80"), [Insert(REPLACEMENT)]);
    }

    #[test]
    fn test_meta_non_ascii_discarded() {
        assert_eq!(decode("\x1bé!".as_bytes()), [Insert('!')]);
        assert_eq!(decode("\x1b[1語x".as_bytes()), [Insert('x')]);
        assert!(decode("\x1b[é".as_bytes()).is_empty());

        let mut dec = Decoder::new();
        let bytes = "\x1bé".as_bytes();

        assert!(dec.decode(&bytes[..2]).is_empty());
        assert!(dec.is_pending());
        assert!(dec.decode(&bytes[2..]).is_empty());
        assert!(!dec.is_pending());
        assert_eq!(dec.decode(b"z"), [Insert('z')]);
    }

    #[test]
    fn test_reset() {
        let mut dec = Decoder::new();

        let _ = dec.decode(b"\x1b[1;");
        dec.reset();
        assert_eq!(dec.decode(b"5C"), [Insert('5'), Insert('C')]);
    }
}

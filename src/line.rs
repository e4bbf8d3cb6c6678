//! Provides the interactive line editing session
//!
//! A `Line` places its terminal in raw mode when created and keeps it there
//! until `restore` is called or the `Line` is dropped. Each call to `read`
//! draws the prompt, then applies decoded commands one at a time until the
//! user submits the line or ends input.

use std::collections::VecDeque;
use std::env::var;
use std::io;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

use tracing::{debug, trace, warn};

use crate::buffer::LineBuffer;
use crate::decoder::{Command, Decoder};
use crate::error::{Error, Result};
use crate::history::History;
use crate::terminal::{
    check_ansi, DefaultTerminal, RawRead, Signal, SignalSet, Size,
    Terminal, TerminalWriter,
};
use crate::util::strip_markers;
use crate::variables::{Config, Variable};

/// Result of a `read` operation
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadResult {
    /// The user submitted a line, with surrounding whitespace removed
    Input(String),
    /// The user ended input with `Ctrl-D`
    Eof,
}

/// Marker sent on the interrupt channel each time the user presses `Ctrl-C`
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Interrupted;

/// Interactive line editing session
///
/// A session may borrow a `History`, which outlives it and may be shared by
/// successive sessions.
pub struct Line<'h, Term: Terminal> {
    term: Term,
    state: Option<Term::PrepareState>,
    buffer: LineBuffer,
    decoder: Decoder,
    history: Option<&'h mut History>,
    config: Config,
    interrupt: Option<SyncSender<Interrupted>>,
    /// Line being edited before history browsing began
    live: Option<String>,
    input: Vec<u8>,
    pending: VecDeque<Command>,
}

impl<'h> Line<'h, DefaultTerminal> {
    /// Opens the terminal associated with standard output and begins
    /// a session.
    ///
    /// Returns `Error::UnsupportedTerminal` if the `TERM` environment
    /// variable names a terminal without ANSI escape sequences.
    pub fn new(config: Config, history: Option<&'h mut History>)
            -> Result<Line<'h, DefaultTerminal>> {
        if !check_ansi() {
            return Err(Error::UnsupportedTerminal(var("TERM").unwrap_or_default()));
        }

        let term = DefaultTerminal::new().map_err(Error::Output)?;
        Line::with_term(term, config, history)
    }
}

impl<'h, Term: Terminal> Line<'h, Term> {
    /// Begins a session on the given terminal, placing it in raw mode.
    ///
    /// If a `History` is given, its capacity is set to
    /// `config.history_size`.
    pub fn with_term(term: Term, config: Config, mut history: Option<&'h mut History>)
            -> Result<Line<'h, Term>> {
        let mut signals = SignalSet::new();
        signals.insert(Signal::Interrupt);
        signals.insert(Signal::Continue);
        signals.insert(Signal::Resize);

        // Nothing may fail between entering raw mode and building the `Line`
        // whose `Drop` restores it.
        let columns = term.lock_write().size()?.columns;

        let state = term.lock_read().prepare(true, signals).map_err(Error::Input)?;

        if let Some(ref mut h) = history {
            h.set_capacity(config.history_size);
        }

        debug!(terminal = term.name(), columns, "entered raw mode");

        Ok(Line{
            buffer: LineBuffer::new(&config.primary_prompt, columns,
                config.buffer_capacity, config.max_line_len),
            term,
            state: Some(state),
            decoder: Decoder::new(),
            history,
            config,
            interrupt: None,
            live: None,
            input: Vec::new(),
            pending: VecDeque::new(),
        })
    }

    /// Returns a receiver notified each time the user presses `Ctrl-C`.
    ///
    /// The channel holds a single notification; while one is pending,
    /// further interrupts are not queued. Calling this method again
    /// replaces the previous channel.
    pub fn interrupts(&mut self) -> Receiver<Interrupted> {
        let (tx, rx) = sync_channel(1);
        self.interrupt = Some(tx);
        rx
    }

    /// Returns a reference to the terminal.
    pub fn terminal(&self) -> &Term {
        &self.term
    }

    /// Returns the current line buffer.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Returns the borrowed history, if any.
    pub fn history(&self) -> Option<&History> {
        self.history.as_ref().map(|h| &**h)
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sets a configuration variable by name, returning its previous value.
    ///
    /// Takes effect at the next `read`, except `history-size`, which
    /// applies immediately.
    pub fn set_variable(&mut self, name: &str, value: &str) -> Option<Variable<'static>> {
        let old = self.config.set_variable(name, value);

        if old.is_some() && name == "history-size" {
            if let Some(ref mut h) = self.history {
                h.set_capacity(self.config.history_size);
            }
        }

        old
    }

    /// Returns whether the terminal is still in raw mode.
    pub fn is_prepared(&self) -> bool {
        self.state.is_some()
    }

    /// Restores the terminal to the state it had before the session began.
    ///
    /// Only the first call has any effect; the session must not be used
    /// to read after it is restored.
    pub fn restore(&mut self) -> Result<()> {
        if let Some(state) = self.state.take() {
            self.term.lock_read().restore(state)?;
            debug!("restored terminal");
        }
        Ok(())
    }

    /// Discards the current line and draws the prompt on a cleared line.
    pub fn prompt(&mut self) -> Result<()> {
        let mut w = self.term.lock_write();

        self.buffer.reset();
        self.buffer.draw_prompt(&mut *w)?;
        w.flush()?;
        Ok(())
    }

    /// Reads a line using the primary prompt.
    pub fn read(&mut self) -> Result<ReadResult> {
        let prompt = self.config.primary_prompt.clone();
        self.read_line(&prompt)
    }

    /// Reads a line using the continuation prompt.
    pub fn read_continuation(&mut self) -> Result<ReadResult> {
        let prompt = self.config.continuation_prompt.clone();
        self.read_line(&prompt)
    }

    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        if self.state.is_none() {
            return Err(Error::Input(io::Error::new(io::ErrorKind::Other,
                "terminal has been restored")));
        }

        let columns = self.term.lock_write().size()?.columns;

        self.buffer = LineBuffer::new(prompt, columns,
            self.config.buffer_capacity, self.config.max_line_len);
        self.end_browsing();
        self.prompt()?;

        loop {
            if let Some(cmd) = self.pending.pop_front() {
                if let Some(res) = self.execute(cmd)? {
                    return Ok(res);
                }
                continue;
            }

            self.input.clear();
            let read = self.term.lock_read().read(&mut self.input)
                .map_err(Error::Input)?;

            match read {
                RawRead::Bytes(0) => {
                    return Err(Error::Input(io::Error::new(
                        io::ErrorKind::UnexpectedEof, "end of input stream")));
                }
                RawRead::Bytes(_) => {
                    let cmds = self.decoder.decode(&self.input);
                    self.pending.extend(cmds);
                }
                RawRead::Resize(size) => self.handle_resize(size)?,
                RawRead::Signal(Signal::Interrupt) => {
                    let _ = self.execute(Command::Interrupt)?;
                }
                RawRead::Signal(Signal::Continue) => {
                    let mut w = self.term.lock_write();
                    self.buffer.refresh(&mut *w)?;
                    w.flush()?;
                }
                RawRead::Signal(sig) => trace!(signal = ?sig, "ignoring signal"),
            }
        }
    }

    /// Writes `prompt`, if not empty, and waits for a single keypress.
    ///
    /// The key is returned as the command it is bound to; a printable
    /// character is returned as `Command::Insert`. Nothing is echoed and
    /// the line buffer is not changed. `Ctrl-C`, whether typed or delivered
    /// as a signal, notifies the interrupt channel and is returned as
    /// `Command::Interrupt`.
    pub fn read_key(&mut self, prompt: &str) -> Result<Command> {
        if self.state.is_none() {
            return Err(Error::Input(io::Error::new(io::ErrorKind::Other,
                "terminal has been restored")));
        }

        if !prompt.is_empty() {
            let mut w = self.term.lock_write();
            w.write(&strip_markers(prompt))?;
            w.flush()?;
        }

        loop {
            if let Some(cmd) = self.pending.pop_front() {
                if cmd == Command::Interrupt {
                    self.notify_interrupt();
                }
                return Ok(cmd);
            }

            self.input.clear();
            let read = self.term.lock_read().read(&mut self.input)
                .map_err(Error::Input)?;

            match read {
                RawRead::Bytes(0) => {
                    return Err(Error::Input(io::Error::new(
                        io::ErrorKind::UnexpectedEof, "end of input stream")));
                }
                RawRead::Bytes(_) => {
                    let cmds = self.decoder.decode(&self.input);
                    self.pending.extend(cmds);
                }
                RawRead::Resize(size) => self.buffer.set_columns(size.columns),
                RawRead::Signal(Signal::Interrupt) => {
                    self.notify_interrupt();
                    return Ok(Command::Interrupt);
                }
                RawRead::Signal(sig) => trace!(signal = ?sig, "ignoring signal"),
            }
        }
    }

    fn handle_resize(&mut self, size: Size) -> Result<()> {
        debug!(lines = size.lines, columns = size.columns, "terminal resized");

        let mut w = self.term.lock_write();
        self.buffer.resize(&mut *w, size.columns)?;
        w.flush()?;
        Ok(())
    }

    fn end_browsing(&mut self) {
        if let Some(ref mut h) = self.history {
            h.reset();
        }
        self.live = None;
    }

    /// Applies a single command; returns a result if the read is complete.
    fn execute(&mut self, cmd: Command) -> Result<Option<ReadResult>> {
        use crate::decoder::Command::*;

        trace!(command = %cmd, "execute");

        if is_edit(cmd) {
            // The recalled entry becomes the line being edited.
            self.end_browsing();
        }

        let mut w = self.term.lock_write();
        let buf = &mut self.buffer;

        let res = match cmd {
            Insert(ch) => {
                match buf.insert_rune(&mut *w, ch) {
                    Err(Error::Capacity{max}) => {
                        warn!(max, "line length limit reached; input rejected");
                    }
                    r => r?
                }
                None
            }
            AcceptLine => {
                buf.end(&mut *w)?;
                w.write("\r\n")?;

                let line = buf.to_string().trim().to_owned();

                if let Some(ref mut h) = self.history {
                    h.add(&line[..]);
                }
                self.live = None;

                Some(ReadResult::Input(line))
            }
            BackwardDeleteChar => {
                buf.delete_char_prev(&mut *w)?;
                None
            }
            DeleteChar => {
                buf.delete_char(&mut *w)?;
                None
            }
            Interrupt => {
                buf.end(&mut *w)?;
                if self.config.echo_control_characters {
                    echo_control(buf, &mut *w, 'C')?;
                }
                w.write("\r\n")?;

                if let Some(ref mut h) = self.history {
                    h.reset();
                }
                self.live = None;

                buf.reset();
                buf.draw_prompt(&mut *w)?;

                w.flush()?;
                drop(w);
                self.notify_interrupt();
                return Ok(None);
            }
            EndOfFile => {
                buf.end(&mut *w)?;
                if self.config.echo_control_characters {
                    echo_control(buf, &mut *w, 'D')?;
                }
                w.write("\r\n")?;

                if let Some(ref mut h) = self.history {
                    h.reset();
                }
                self.live = None;

                Some(ReadResult::Eof)
            }
            TransposeChars => {
                buf.swap(&mut *w)?;
                None
            }
            DeleteLine => {
                buf.delete_line(&mut *w)?;
                buf.draw_prompt(&mut *w)?;
                None
            }
            ClearScreen => {
                w.clear_screen()?;
                buf.draw_prompt(&mut *w)?;
                None
            }
            KillToEnd => {
                buf.delete_to_right(&mut *w)?;
                None
            }
            BeginningOfLine => {
                buf.start(&mut *w)?;
                None
            }
            EndOfLine => {
                buf.end(&mut *w)?;
                None
            }
            BackwardChar => {
                buf.backward(&mut *w)?;
                None
            }
            ForwardChar => {
                buf.forward(&mut *w)?;
                None
            }
            BackwardWord => {
                buf.word_backward(&mut *w)?;
                None
            }
            ForwardWord => {
                buf.word_forward(&mut *w)?;
                None
            }
            PreviousHistory => {
                if let Some(ref mut h) = self.history {
                    let was_browsing = h.is_browsing();

                    if let Some(entry) = h.prev().map(|s| s.to_owned()) {
                        if !was_browsing {
                            self.live = Some(buf.to_string());
                        }
                        buf.set_contents(&mut *w, &entry)?;
                    }
                }
                None
            }
            NextHistory => {
                if let Some(ref mut h) = self.history {
                    if h.is_browsing() {
                        let text = match h.next() {
                            Some(entry) => entry.to_owned(),
                            None => self.live.take().unwrap_or_default()
                        };
                        buf.set_contents(&mut *w, &text)?;
                    }
                }
                None
            }
        };

        w.flush()?;
        Ok(res)
    }

    fn notify_interrupt(&mut self) {
        let mut disconnected = false;

        if let Some(ref tx) = self.interrupt {
            match tx.try_send(Interrupted) {
                Ok(()) => (),
                Err(TrySendError::Full(_)) => {
                    trace!("interrupt notification already pending");
                }
                Err(TrySendError::Disconnected(_)) => disconnected = true,
            }
        }

        if disconnected {
            trace!("interrupt receiver dropped");
            self.interrupt = None;
        }
    }
}

impl<'h, Term: Terminal> Drop for Line<'h, Term> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Returns whether a command modifies the line content.
fn is_edit(cmd: Command) -> bool {
    use crate::decoder::Command::*;

    match cmd {
        Insert(_) | BackwardDeleteChar | DeleteChar | TransposeChars |
        DeleteLine | KillToEnd => true,
        _ => false
    }
}

/// Echoes a control character in caret notation at the end of the line.
fn echo_control<Term: Terminal>(buf: &mut LineBuffer, w: &mut dyn TerminalWriter<Term>,
        ch: char) -> Result<()> {
    match buf.insert_runes(w, &['^', ch]) {
        Err(Error::Capacity{..}) => {
            w.write(&format!("^{}", ch))?;
            Ok(())
        }
        r => r
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::{Interrupted, Line, ReadResult};
    use crate::decoder::Command;
    use crate::error::Error;
    use crate::history::History;
    use crate::memory::MemoryTerminal;
    use crate::terminal::{Signal, Size};
    use crate::variables::Config;

    fn term() -> MemoryTerminal {
        MemoryTerminal::with_size(Size{lines: 6, columns: 20})
    }

    fn assert_lines(mem: &MemoryTerminal, tests: &[&str]) {
        let lines = mem.lines();
        let expected = tests.iter().map(|s| s.trim_end()).collect::<Vec<_>>();
        assert_eq!(lines, expected);
    }

    fn input(s: &str) -> ReadResult {
        ReadResult::Input(s.to_owned())
    }

    #[test]
    fn test_read_simple() {
        let mem = term();
        mem.push_input("  hello world \r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert!(mem.is_raw_mode());
        assert_eq!(line.read().unwrap(), input("hello world"));
        assert_lines(&mem, &["$   hello world", "", "", "", "", ""]);
        assert_eq!(mem.cursor(), (1, 0));
    }

    #[test]
    fn test_typeahead() {
        let mem = term();
        mem.push_input("one\rtwo\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read().unwrap(), input("one"));
        assert_eq!(line.read().unwrap(), input("two"));
        assert_lines(&mem, &["$ one", "$ two", "", "", "", ""]);
    }

    #[test]
    fn test_continuation() {
        let mem = term();
        mem.push_input("a\\\rb\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read().unwrap(), input("a\\"));
        assert_eq!(line.read_continuation().unwrap(), input("b"));
        assert_lines(&mem, &["$ a\\", "> b", "", "", "", ""]);
    }

    #[test]
    fn test_editing_keys() {
        let mem = term();
        // "wrold", Ctrl-B x3, Ctrl-T, Ctrl-E, "!", Home, Delete, End
        mem.push_input("wrold\x02\x02\x02\x14\x05!\x1b[H\x1b[3~\x1b[F\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read().unwrap(), input("orld!"));
    }

    #[test]
    fn test_kill_and_words() {
        let mem = term();
        mem.push_input("alpha beta gamma\x1b[1;5D\x1b[1;5D\x0b\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read().unwrap(), input("alpha"));
    }

    #[test]
    fn test_interrupt() {
        let mem = term();
        mem.push_input("abc\x03xyz\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();
        let rx = line.interrupts();

        assert_eq!(line.read().unwrap(), input("xyz"));
        assert_eq!(rx.try_recv(), Ok(Interrupted));
        assert!(rx.try_recv().is_err());
        assert_lines(&mem, &["$ abc^C", "$ xyz", "", "", "", ""]);
    }

    #[test]
    fn test_interrupt_single_slot() {
        let mem = term();
        mem.push_input("\x03\x03\x03done\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();
        let rx = line.interrupts();

        assert_eq!(line.read().unwrap(), input("done"));
        assert_eq!(rx.try_recv(), Ok(Interrupted));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_interrupt_signal() {
        let mem = term();
        mem.push_signal(Signal::Interrupt);
        mem.push_input("ok\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();
        let rx = line.interrupts();
        drop(rx);

        assert_eq!(line.read().unwrap(), input("ok"));
        assert_lines(&mem, &["$ ^C", "$ ok", "", "", "", ""]);
    }

    #[test]
    fn test_no_echo() {
        let mem = term();
        mem.push_input("abc\x03\x04");

        let mut config = Config::default();
        config.echo_control_characters = false;

        let mut line = Line::with_term(mem.clone(), config, None).unwrap();

        assert_eq!(line.read().unwrap(), ReadResult::Eof);
        assert_lines(&mem, &["$ abc", "$", "", "", "", ""]);
    }

    #[test]
    fn test_history_browsing() {
        let mem = term();
        let mut hist = History::new(10);
        hist.add("first");
        hist.add("second");

        // Up, Up, Down, Down returns to the live line
        mem.push_input("live\x1b[A\x1b[A\x1b[B\x1b[B\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), Some(&mut hist)).unwrap();

        assert_eq!(line.read().unwrap(), input("live"));
        drop(line);

        let entries = hist.iter().map(|s| &s[..]).collect::<Vec<_>>();
        assert_eq!(entries, ["first", "second", "live"]);
    }

    #[test]
    fn test_history_edit_not_persisted() {
        let mem = term();
        let mut hist = History::new(10);
        hist.add("make test");

        // Recall, edit, submit; then recall twice
        mem.push_input("\x10\x7f\x7f\x7f\x7fbuild\r\x10\x10\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), Some(&mut hist)).unwrap();

        assert_eq!(line.read().unwrap(), input("make build"));
        assert_eq!(line.read().unwrap(), input("make test"));
        drop(line);

        let entries = hist.iter().map(|s| &s[..]).collect::<Vec<_>>();
        assert_eq!(entries, ["make test", "make build", "make test"]);
    }

    #[test]
    fn test_history_size_variable() {
        let mem = term();
        let mut hist = History::new(100);

        let mut config = Config::default();
        config.history_size = 3;

        let mut line = Line::with_term(mem.clone(), config, Some(&mut hist)).unwrap();
        assert_eq!(line.history().map(|h| h.capacity()), Some(3));

        assert!(line.set_variable("history-size", "7").is_some());
        assert_eq!(line.history().map(|h| h.capacity()), Some(7));
    }

    #[test]
    fn test_capacity_rejected() {
        let mem = term();
        mem.push_input("abcdef\r");

        let mut config = Config::default();
        config.max_line_len = 4;

        let mut line = Line::with_term(mem.clone(), config, None).unwrap();

        assert_eq!(line.read().unwrap(), input("abcd"));
    }

    #[test]
    fn test_clear_screen() {
        let mem = term();
        mem.write("noise\r\nmore noise\r\n");
        mem.push_input("ab\x0cc\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read().unwrap(), input("abc"));
        assert_lines(&mem, &["$ abc", "", "", "", "", ""]);
    }

    #[test]
    fn test_resize() {
        let mem = term();
        mem.push_input("0123456789abcdefghijkl");
        mem.push_resize(Size{lines: 6, columns: 30});

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        // Resize notifications precede queued input
        mem.push_input("\r");
        assert_eq!(line.read().unwrap(), input("0123456789abcdefghijkl"));
        assert_eq!(line.buffer().columns(), 30);
        assert_lines(&mem, &["$ 0123456789abcdefghijkl", "", "", "", "", ""]);
    }

    #[test]
    fn test_continue_redraws_wrapped_line() {
        let mem = MemoryTerminal::with_size(Size{lines: 5, columns: 10});
        mem.push_input("a\rxxxxxxxxxxxxxx");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read().unwrap(), input("a"));

        mem.push_signal(Signal::Continue);
        mem.push_input("\r");

        assert_eq!(line.read().unwrap(), input("xxxxxxxxxxxxxx"));
        assert_lines(&mem, &["$ a", "$ xxxxxxxx", "xxxxxx", "", ""]);
    }

    #[test]
    fn test_read_key() {
        let mem = term();
        mem.push_input("y\x1b[Aab\r");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read_key("Proceed? ").unwrap(), Command::Insert('y'));
        assert_eq!(line.read_key("").unwrap(), Command::PreviousHistory);
        assert_lines(&mem, &["Proceed?", "", "", "", "", ""]);
        assert_eq!(mem.cursor(), (0, 9));

        // Remaining keys are left for the next read
        mem.write("\r\n");
        assert_eq!(line.read().unwrap(), input("ab"));
    }

    #[test]
    fn test_read_key_interrupt() {
        let mem = term();
        mem.push_input("\x03");
        mem.push_signal(Signal::Interrupt);

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();
        let rx = line.interrupts();

        assert_eq!(line.read_key("").unwrap(), Command::Interrupt);
        assert_eq!(rx.try_recv(), Ok(Interrupted));

        assert_eq!(line.read_key("").unwrap(), Command::Interrupt);
        assert_eq!(rx.try_recv(), Ok(Interrupted));
    }

    #[test]
    fn test_read_key_invisible_prompt() {
        let mem = term();
        mem.push_input("n");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_eq!(line.read_key("\x01\x02ok? ").unwrap(), Command::Insert('n'));
        assert_lines(&mem, &["ok?", "", "", "", "", ""]);
    }

    #[test]
    fn test_setup_failure_leaves_cooked_mode() {
        let mem = term();
        mem.set_fail_size(true);

        let res = Line::with_term(mem.clone(), Config::default(), None);

        assert_matches!(res.err(), Some(Error::Output(_)));
        assert!(!mem.is_raw_mode());
    }

    #[test]
    fn test_read_error() {
        let mem = term();
        mem.push_input("abc");
        mem.set_fail_read(true);

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_matches!(line.read(), Err(Error::Input(_)));
        line.restore().unwrap();
        assert!(!mem.is_raw_mode());
    }

    #[test]
    fn test_write_error() {
        let mem = term();
        mem.push_input("abc\r");
        mem.set_fail_write(true);

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_matches!(line.read(), Err(Error::Output(_)));
    }

    #[test]
    fn test_end_of_stream() {
        let mem = term();
        mem.push_input("abc");

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();

        assert_matches!(line.read(), Err(Error::Input(ref e))
            if e.kind() == std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_restore_once() {
        let mem = term();

        let mut line = Line::with_term(mem.clone(), Config::default(), None).unwrap();
        assert!(line.is_prepared());

        line.restore().unwrap();
        line.restore().unwrap();
        assert!(!line.is_prepared());
        assert_matches!(line.read(), Err(Error::Input(_)));

        drop(line);
        assert_eq!(mem.restore_count(), 1);
    }

    #[test]
    fn test_drop_restores() {
        let mem = term();

        let line = Line::with_term(mem.clone(), Config::default(), None).unwrap();
        drop(line);

        assert!(!mem.is_raw_mode());
        assert_eq!(mem.restore_count(), 1);
    }
}

//! Provides a bounded, persistent list of previously entered lines

use std::collections::{vec_deque, VecDeque};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Default maximum number of history entries
pub const DEFAULT_HISTORY_SIZE: usize = 500;

/// Ordered list of previously entered lines, oldest first
///
/// While the user browses with `prev` and `next`, the history holds a cursor
/// into its entries. Entries themselves are never modified while browsing.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<String>,
    cursor: Option<usize>,
    capacity: usize,
    path: Option<PathBuf>,
}

impl Default for History {
    fn default() -> History {
        History::new(DEFAULT_HISTORY_SIZE)
    }
}

impl History {
    /// Creates an empty history retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> History {
        History{
            entries: VecDeque::new(),
            cursor: None,
            capacity,
            path: None,
        }
    }

    /// Creates an empty history backed by the file at `path`.
    ///
    /// The file is not read until `load` is called.
    pub fn with_path<P: Into<PathBuf>>(path: P, capacity: usize) -> History {
        History{
            path: Some(path.into()),
            .. History::new(capacity)
        }
    }

    /// Returns the conventional history file for an application,
    /// `~/.{app}_history`.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn default_path(app: &str) -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(format!(".{}_history", app)))
    }

    /// Returns the path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref().map(|p| p.as_path())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sets the maximum number of entries, discarding the oldest
    /// entries if there are more than `capacity`.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.truncate(capacity);
    }

    /// Returns an iterator over entries, oldest first.
    pub fn iter(&self) -> vec_deque::Iter<String> {
        self.entries.iter()
    }

    /// Returns the entry at index `n`, where `0` is the oldest.
    pub fn get(&self, n: usize) -> Option<&str> {
        self.entries.get(n).map(|s| &s[..])
    }

    /// Appends an entry, evicting the oldest if the history is full.
    ///
    /// Empty lines are not added, nor are lines containing a line break,
    /// which could not be saved as a single record. Any browsing position
    /// is reset.
    pub fn add<S: Into<String>>(&mut self, line: S) {
        let line = line.into();

        self.cursor = None;

        if line.is_empty() || self.capacity == 0 {
            return;
        }

        if line.contains(|ch: char| ch == '\n' || ch == '\r') {
            debug!("not adding multi-line history entry");
            return;
        }

        if self.entries.len() >= self.capacity {
            self.truncate(self.capacity - 1);
        }

        self.entries.push_back(line);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    fn truncate(&mut self, n: usize) {
        let len = self.entries.len();

        if n < len {
            let _ = self.entries.drain(..len - n);
            self.cursor = None;
        }
    }

    /// Returns whether an entry is currently selected by `prev` or `next`.
    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Returns the index of the selected entry, if browsing.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Stops browsing without changing any entry.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Selects the entry preceding the current one and returns it.
    ///
    /// If not browsing, the most recent entry is selected.
    /// Returns `None`, leaving the selection unchanged, if there is no
    /// earlier entry.
    pub fn prev(&mut self) -> Option<&str> {
        let new = match self.cursor {
            Some(0) => return None,
            Some(n) => n - 1,
            None if self.entries.is_empty() => return None,
            None => self.entries.len() - 1,
        };

        self.cursor = Some(new);
        self.get(new)
    }

    /// Selects the entry following the current one and returns it.
    ///
    /// Returns `None` if not browsing, or if the most recent entry was
    /// selected; in the latter case, browsing ends.
    pub fn next(&mut self) -> Option<&str> {
        let old = self.cursor?;

        if old + 1 >= self.entries.len() {
            self.cursor = None;
            return None;
        }

        self.cursor = Some(old + 1);
        self.get(old + 1)
    }

    /// Reads entries from the backing file, appending them in file order.
    ///
    /// A missing file is treated as empty history. Does nothing if the
    /// history has no backing file.
    pub fn load(&mut self) -> io::Result<()> {
        match self.path.clone() {
            Some(path) => self.load_from(&path),
            None => Ok(())
        }
    }

    /// Reads entries from the file at `path`, appending them in file order.
    ///
    /// A missing file is treated as empty history.
    pub fn load_from<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        let file = match File::open(path) {
            Ok(f) => f,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "history file not found");
                return Ok(());
            }
            Err(e) => return Err(e)
        };

        let rdr = BufReader::new(file);
        let mut n = 0;

        for line in rdr.lines() {
            self.add(line?);
            n += 1;
        }

        debug!(path = %path.display(), lines = n, "loaded history");
        Ok(())
    }

    /// Writes all entries to the backing file, replacing its contents.
    ///
    /// Does nothing if the history has no backing file.
    pub fn save(&self) -> io::Result<()> {
        match self.path {
            Some(ref path) => self.save_to(path),
            None => Ok(())
        }
    }

    /// Writes all entries to the file at `path`, replacing its contents.
    ///
    /// On Unix, a newly created file is readable only by its owner.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        let mut opts = OpenOptions::new();
        opts.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o600);
        }

        let file = opts.open(path)?;
        let mut wtr = BufWriter::new(file);

        for entry in &self.entries {
            wtr.write_all(entry.as_bytes())?;
            wtr.write_all(b"\n")?;
        }

        wtr.flush()?;

        debug!(path = %path.display(), entries = self.entries.len(), "saved history");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a String;
    type IntoIter = vec_deque::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

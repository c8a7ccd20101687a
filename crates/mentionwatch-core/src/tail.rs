//! Incremental line reader over a file that another process appends to.
//!
//! [`LineSource::poll_line`] never blocks: it hands back one complete line if
//! one is available and `None` otherwise. Bytes after the last newline are
//! held back until the producer finishes the line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::watch::WatchError;

/// Where reading begins when the file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartAt {
    /// Only lines appended after startup are seen.
    #[default]
    End,
    /// Existing content is replayed first.
    Beginning,
}

pub struct LineSource {
    path: PathBuf,
    reader: BufReader<File>,
    /// Bytes consumed from the file, including any held-back partial line.
    offset: u64,
    partial: Vec<u8>,
}

impl LineSource {
    /// Open `path` for tailing. A missing file is reported as
    /// [`WatchError::MissingInput`].
    pub fn open(path: impl AsRef<Path>, start: StartAt) -> Result<Self, WatchError> {
        let path = path.as_ref().to_path_buf();
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WatchError::MissingInput(path));
            }
            Err(e) => return Err(WatchError::Io(e)),
        };
        let mut reader = BufReader::new(file);
        let offset = match start {
            StartAt::End => reader.seek(SeekFrom::End(0))?,
            StartAt::Beginning => 0,
        };
        log::debug!("tailing {} from offset {offset}", path.display());
        Ok(Self {
            path,
            reader,
            offset,
            partial: Vec::new(),
        })
    }

    /// Return the next complete line without its terminator (`\n` or
    /// `\r\n`), or `None` if no full line has been written yet.
    pub fn poll_line(&mut self) -> io::Result<Option<String>> {
        self.rewind_if_truncated()?;

        let n = self.reader.read_until(b'\n', &mut self.partial)?;
        self.offset += n as u64;
        if self.partial.last() != Some(&b'\n') {
            return Ok(None);
        }

        let mut bytes = std::mem::take(&mut self.partial);
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// If the file shrank below what we've already read, start over from the
    /// beginning. Truncation followed by a rewrite longer than the old
    /// offset between two polls is not detectable this way.
    fn rewind_if_truncated(&mut self) -> io::Result<()> {
        let len = self.reader.get_ref().metadata()?.len();
        if len < self.offset {
            log::warn!(
                "{} shrank from {} to {len} bytes; reading again from the start",
                self.path.display(),
                self.offset
            );
            self.reader.seek(SeekFrom::Start(0))?;
            self.offset = 0;
            self.partial.clear();
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes of an unfinished trailing line currently held back.
    pub fn pending_bytes(&self) -> usize {
        self.partial.len()
    }
}

// Log source reader
//
// Opens plain or gzip-compressed log files and yields 1-based numbered lines.

use crate::error::AuditError;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// An opened log source: a display name plus a line-oriented reader.
///
/// The underlying file handle is released when the source is dropped, which
/// happens at the end of each pass whether it succeeded or failed.
pub struct LogSource {
    name: String,
    reader: Box<dyn BufRead>,
}

impl LogSource {
    /// Open a log file, decompressing transparently when the path ends in `.gz`
    pub fn open(path: &Path) -> Result<Self, AuditError> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| AuditError::FileSystem {
            path: name.clone(),
            source,
        })?;

        let reader: Box<dyn BufRead> = if is_gzip(path) {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self { name, reader })
    }

    /// Wrap an in-memory or otherwise pre-opened reader
    pub fn from_reader(name: impl Into<String>, reader: impl BufRead + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_parts(self) -> (String, Box<dyn BufRead>) {
        (self.name, self.reader)
    }
}

impl std::fmt::Debug for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSource").field("name", &self.name).finish()
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Iterator over `(line_number, line)` pairs. Line numbers start at 1.
///
/// Lines are split on raw bytes and decoded lossily, so stray non-UTF-8
/// bytes never stop a pass. Only genuine I/O failures (truncated or corrupt
/// gzip, for instance) surface as [`AuditError::Read`].
pub struct NumberedLines<R> {
    source_name: String,
    lines: io::Split<R>,
    line: usize,
}

pub fn numbered_lines<R: BufRead>(source_name: &str, reader: R) -> NumberedLines<R> {
    NumberedLines {
        source_name: source_name.to_string(),
        lines: reader.split(b'\n'),
        line: 0,
    }
}

impl<R: BufRead> Iterator for NumberedLines<R> {
    type Item = Result<(usize, String), AuditError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.lines.next()?;
        self.line += 1;

        match item {
            Ok(mut bytes) => {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                let text = match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
                };
                Some(Ok((self.line, text)))
            }
            Err(source) => Some(Err(AuditError::Read {
                source_name: self.source_name.clone(),
                line: self.line,
                source,
            })),
        }
    }
}

//! Raw line sources

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Lazily yields the raw lines stored at a path.
pub trait LineSource: Send + Sync {
    fn lines(&self, path: &Path) -> io::Result<Box<dyn Iterator<Item = io::Result<String>>>>;
}

/// Reads newline-delimited text files from the local filesystem.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read,
/// since dumps from many publishers mix encodings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLineSource;

impl LineSource for FileLineSource {
    fn lines(&self, path: &Path) -> io::Result<Box<dyn Iterator<Item = io::Result<String>>>> {
        let mut reader = BufReader::new(File::open(path)?);
        let iter = std::iter::from_fn(move || {
            let mut buf = Vec::new();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => None,
                Ok(_) => Some(Ok(String::from_utf8_lossy(&buf).into_owned())),
                Err(e) => Some(Err(e)),
            }
        });
        Ok(Box::new(iter))
    }
}

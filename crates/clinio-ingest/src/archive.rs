//! Lazy ZIP entry source
//!
//! Wraps `zip::ZipArchive` as a pull-based sequence: the central directory is
//! read once up front (metadata only), then entries are opened one at a time
//! on demand. The whole archive is never resident in memory; entry content is
//! streamed through the [`ArchiveEntry`] handle, and the mutable borrow on the
//! source guarantees at most one content stream is live at a time.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use zip::read::ZipFile;
use zip::ZipArchive;

use crate::error::{ImportError, ImportResult};

/// Metadata of one archive entry.
#[derive(Debug, Clone)]
pub struct ArchiveEntryInfo {
    /// Entry name as stored in the archive, forward-slash separated.
    pub name: String,
    /// Directory entries (name ends with `/`) carry no content.
    pub is_dir: bool,
    /// Uncompressed size as declared by the entry header.
    pub size_bytes: u64,
}

/// Pull-based entry sequence over a seekable ZIP byte source.
#[derive(Debug)]
pub struct ZipEntrySource<R: Read + Seek> {
    archive: ZipArchive<R>,
    cursor: usize,
}

impl ZipEntrySource<BufReader<File>> {
    /// Open an archive from a file on disk.
    pub fn open_path(path: &Path) -> ImportResult<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipEntrySource<R> {
    /// Parse the central directory of `reader`. Fails with
    /// [`ImportError::ArchiveCorrupt`] when the trailer or central directory
    /// cannot be located.
    pub fn new(reader: R) -> ImportResult<Self> {
        let archive =
            ZipArchive::new(reader).map_err(|e| ImportError::ArchiveCorrupt(e.to_string()))?;
        Ok(ZipEntrySource { archive, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Advance to the next entry, or `None` once all entries are consumed.
    ///
    /// The yielded handle borrows this source mutably; drain or drop it
    /// before requesting the next entry. A per-entry open failure is
    /// [`ImportError::EntryRead`] and does not consume the remaining entries,
    /// though callers treat it as structural and abort.
    pub fn next_entry(&mut self) -> Option<ImportResult<ArchiveEntry<'_>>> {
        if self.cursor >= self.archive.len() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;

        let result = match self.archive.by_index(index) {
            Ok(file) => {
                let info = ArchiveEntryInfo {
                    name: file.name().to_string(),
                    is_dir: file.is_dir(),
                    size_bytes: file.size(),
                };
                Ok(ArchiveEntry { info, file })
            }
            Err(source) => Err(ImportError::EntryRead {
                name: format!("entry #{}", index),
                source,
            }),
        };
        Some(result)
    }
}

/// One archive entry with its content stream.
pub struct ArchiveEntry<'a> {
    info: ArchiveEntryInfo,
    file: ZipFile<'a>,
}

impl ArchiveEntry<'_> {
    pub fn info(&self) -> &ArchiveEntryInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn is_dir(&self) -> bool {
        self.info.is_dir
    }

    pub fn size_bytes(&self) -> u64 {
        self.info.size_bytes
    }
}

impl Read for ArchiveEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

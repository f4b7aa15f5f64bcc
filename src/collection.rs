//! Binary frequency-collection input format.
//!
//! A collection basename names two files. `<basename>.docs` holds u32
//! little-endian sequences framed as `[len][values...]`; the first
//! sequence is the singleton `[num_docs]`, every later sequence is one
//! list's ascending document ids. `<basename>.freqs` holds one matching
//! frequency sequence per list, with no header. The store never inspects
//! this format itself; the CLI drives it and feeds plain slices to the
//! builder.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Result, XystonError};

/// One posting list read from a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingInput {
    /// Ascending document ids.
    pub docs: Vec<u32>,
    /// One frequency per document.
    pub freqs: Vec<u32>,
}

/// A binary frequency collection on disk.
#[derive(Debug)]
pub struct BinaryFreqCollection {
    docs_path: PathBuf,
    freqs_path: PathBuf,
    num_docs: u64,
}

fn sibling(basename: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(basename.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Read one `[len][values...]` sequence; `Ok(None)` at a clean EOF.
fn read_sequence<R: Read>(reader: &mut R) -> Result<Option<Vec<u32>>> {
    let len = match reader.read_u32::<LittleEndian>() {
        Ok(len) => len,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut values = Vec::with_capacity(len as usize);
    for _ in 0..len {
        let value = reader.read_u32::<LittleEndian>().map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                XystonError::malformed_input("collection sequence ends mid-frame")
            } else {
                e.into()
            }
        })?;
        values.push(value);
    }
    Ok(Some(values))
}

fn write_sequence<W: Write>(writer: &mut W, values: &[u32]) -> Result<()> {
    writer.write_u32::<LittleEndian>(values.len() as u32)?;
    for &value in values {
        writer.write_u32::<LittleEndian>(value)?;
    }
    Ok(())
}

impl BinaryFreqCollection {
    /// Open `<basename>.docs` / `<basename>.freqs` and read the document
    /// count header.
    pub fn open<P: AsRef<Path>>(basename: P) -> Result<Self> {
        let docs_path = sibling(basename.as_ref(), ".docs");
        let freqs_path = sibling(basename.as_ref(), ".freqs");

        let mut docs = BufReader::new(File::open(&docs_path).map_err(|e| {
            XystonError::storage(format!(
                "failed to open collection file {}: {e}",
                docs_path.display()
            ))
        })?);

        let header = read_sequence(&mut docs)?.ok_or_else(|| {
            XystonError::malformed_input("collection document file is empty")
        })?;
        if header.len() != 1 {
            return Err(XystonError::malformed_input(format!(
                "collection header must be a singleton, got {} values",
                header.len()
            )));
        }

        Ok(BinaryFreqCollection {
            docs_path,
            freqs_path,
            num_docs: header[0] as u64,
        })
    }

    /// Total documents in the source collection.
    pub fn num_docs(&self) -> u64 {
        self.num_docs
    }

    /// A streaming iterator over `(docs, freqs)` posting inputs.
    pub fn iter(&self) -> Result<BinaryFreqIterator> {
        let mut docs = BufReader::new(File::open(&self.docs_path).map_err(|e| {
            XystonError::storage(format!(
                "failed to open collection file {}: {e}",
                self.docs_path.display()
            ))
        })?);
        let freqs = BufReader::new(File::open(&self.freqs_path).map_err(|e| {
            XystonError::storage(format!(
                "failed to open collection file {}: {e}",
                self.freqs_path.display()
            ))
        })?);

        // Skip the num_docs header.
        read_sequence(&mut docs)?;

        Ok(BinaryFreqIterator { docs, freqs })
    }
}

/// Streaming reader over a collection's posting lists.
#[derive(Debug)]
pub struct BinaryFreqIterator {
    docs: BufReader<File>,
    freqs: BufReader<File>,
}

impl Iterator for BinaryFreqIterator {
    type Item = Result<PostingInput>;

    fn next(&mut self) -> Option<Self::Item> {
        let docs = match read_sequence(&mut self.docs) {
            Ok(Some(docs)) => docs,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        let freqs = match read_sequence(&mut self.freqs) {
            Ok(Some(freqs)) => freqs,
            Ok(None) => {
                return Some(Err(XystonError::malformed_input(
                    "frequency file ends before document file",
                )));
            }
            Err(e) => return Some(Err(e)),
        };

        if docs.len() != freqs.len() {
            return Some(Err(XystonError::malformed_input(format!(
                "list has {} documents but {} frequencies",
                docs.len(),
                freqs.len()
            ))));
        }

        Some(Ok(PostingInput { docs, freqs }))
    }
}

/// Write a collection in the binary format read by
/// [`BinaryFreqCollection`]. Used by tests and tooling.
pub fn write_collection<P: AsRef<Path>>(
    basename: P,
    num_docs: u64,
    lists: &[(Vec<u32>, Vec<u32>)],
) -> Result<()> {
    let mut docs = BufWriter::new(File::create(sibling(basename.as_ref(), ".docs"))?);
    let mut freqs = BufWriter::new(File::create(sibling(basename.as_ref(), ".freqs"))?);

    write_sequence(&mut docs, &[num_docs as u32])?;
    for (doc_ids, freq_values) in lists {
        write_sequence(&mut docs, doc_ids)?;
        write_sequence(&mut freqs, freq_values)?;
    }

    docs.flush()?;
    freqs.flush()?;
    Ok(())
}

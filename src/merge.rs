use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Name of the merged filter file inside each source's output directory
pub const MERGED_FILE_NAME: &str = "filtersprefix.conf";

/// Result of a merge
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Merged {
    pub bytes: u64,
    /// Parts that could not be opened and are missing from the merged file
    pub skipped: Vec<PathBuf>,
}

/// Concatenate `parts` into `dest` in the given order
///
/// `dest` is always (re)created, so an empty `parts` leaves an empty file.
/// A part that can't be opened is logged and listed in `Merged::skipped`.
pub fn merge_filters<P: AsRef<Path>>(dest: &Path, parts: &[P]) -> io::Result<Merged> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)?;
    let mut buf = BufWriter::new(file);
    let mut merged = Merged::default();
    for part in parts {
        let part = part.as_ref();
        let mut input = match File::open(part) {
            Ok(input) => input,
            Err(err) => {
                warn!("Skipping {} in merge: {}", part.display(), err);
                merged.skipped.push(part.to_owned());
                continue;
            }
        };
        let bytes = io::copy(&mut input, &mut buf)?;
        debug!("Merged {} ({} bytes)", part.display(), bytes);
        merged.bytes += bytes;
    }
    buf.flush()?;
    Ok(merged)
}

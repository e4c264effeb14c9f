//! Gzip for archived generations when `[rotation] compress = true`.

use crate::Error;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Writes `src` to `dest` as gzip, then removes `src`.
pub(super) fn compress_file(src: &Path, dest: &Path) -> Result<(), Error> {
    let mut reader = BufReader::new(File::open(src)?);
    let writer = BufWriter::new(File::create(dest)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?.flush()?;

    // The archive now holds everything, so the plain copy can go
    fs::remove_file(src)?;
    Ok(())
}

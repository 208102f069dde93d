use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::errors::Result;

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz")) || path.extension() == Some(OsStr::new("bgz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// bgzip output is a series of gzip members, so both go through a `MultiGzDecoder`.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
///
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<Box<dyn BufRead>> {
    if file_path_str == "-" {
        Ok(Box::new(BufReader::new(std::io::stdin())))
    } else {
        Ok(Box::new(get_dynamic_reader(Path::new(file_path_str))?))
    }
}

///
/// Get a writer that gzip-compresses when the path ends in `.gz`.
///
/// Parent directories are created if they don't exist.
///
pub fn get_dynamic_writer(path: &Path) -> Result<Box<dyn Write>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = BufWriter::new(File::create(path)?);
    let writer: Box<dyn Write> = match is_gzipped(path) {
        true => Box::new(GzEncoder::new(file, Compression::default())),
        false => Box::new(file),
    };

    Ok(writer)
}

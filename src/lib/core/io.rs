use crate::core::error::Result;
use crate::core::fs::is_gzipped;
use flate2::read::MultiGzDecoder;
use grep_cli::stdout;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use termcolor::ColorChoice;

const READ_BUFFER: usize = 256 * 1024;

#[inline]
fn is_stdio<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().as_os_str() == "-"
}

/// Open a file (or stdin for `-`) for buffered reading, decompressing `.gz` inputs.
pub fn open_text_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    if is_stdio(path) {
        return Ok(Box::new(BufReader::with_capacity(READ_BUFFER, io::stdin())));
    }

    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if is_gzipped(path) {
        Box::new(BufReader::with_capacity(
            READ_BUFFER,
            MultiGzDecoder::new(file),
        ))
    } else {
        Box::new(BufReader::with_capacity(READ_BUFFER, file))
    };
    Ok(reader)
}

/// Open a file (or stdout for `-`) for buffered writing.
pub fn open_text_writer<P: AsRef<Path>>(path: P) -> Result<Box<dyn Write>> {
    let path = path.as_ref();
    let writer: Box<dyn Write> = if is_stdio(path) {
        Box::new(BufWriter::new(stdout(ColorChoice::Never)))
    } else {
        Box::new(BufWriter::new(File::create(path)?))
    };
    Ok(writer)
}

/// Build a delimited-text reader over a plain or gzipped file.
pub fn get_reader<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
    has_headers: bool,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let raw_reader: Box<dyn Read> = open_text_reader(path)?;

    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(raw_reader))
}

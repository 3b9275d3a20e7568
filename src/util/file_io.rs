use rustc_hash::FxHashSet as HashSet;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::fs::File;
use std::path::Path;

/// Opens a file for reading, wrapping it in a gzip decoder if the extension is ".gz"
/// # Arguments
/// * `filename` - the file path to open
/// # Errors
/// * if the file does not open properly
fn open_maybe_gz(filename: &Path) -> Result<Box<dyn Read>, Box<dyn std::error::Error>> {
    let fp: Box<dyn Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::read::MultiGzDecoder::new(
                File::open(filename)?
            )
        )
    } else {
        Box::new(File::open(filename)?)
    };
    Ok(fp)
}

/// Reads an entire text file into memory, decompressing ".gz" files
/// # Arguments
/// * `filename` - the file path to read
/// # Errors
/// * if the file does not open properly
/// * if the content is not valid UTF-8 or the decompression fails
pub fn read_text_file(filename: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let mut reader = open_maybe_gz(filename)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// This will save a generic serializable struct to JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to 
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file: Box<dyn std::io::Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

/// Helper function that reads a file line-by-line and returns the trimmed, non-empty lines in file order.
/// # Arguments
/// * `filename` - The file to load
/// # Errors
/// * if a file is provided but cannot be opened or read
pub fn load_file_list(filename: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(open_maybe_gz(filename)?);
    let mut lines: Vec<String> = vec![];
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

/// Helper function that will just read a file line-by-line and return the list as a HashSet.
/// # Arguments
/// * `filename` - The file to load into the hash set
/// # Errors
/// * if a file is provided but cannot be opened or read
pub fn load_file_lines(filename: &Path) -> Result<HashSet<String>, Box<dyn std::error::Error>> {
    Ok(load_file_list(filename)?.into_iter().collect())
}

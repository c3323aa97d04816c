use niffler::get_reader;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Opens a plain or compressed (gzip, bzip2, xz, zstd) text input.
///
/// Files too short to carry a compression magic number are read as plain text.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    match get_reader(Box::new(file)) {
        Ok((inner_reader, _compression)) => {
            Ok(Box::new(BufReader::with_capacity(1024 * 1024, inner_reader)))
        }
        Err(niffler::Error::FileTooShort) => Ok(Box::new(BufReader::new(File::open(path)?))),
        Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
    }
}

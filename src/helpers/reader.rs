use crate::error::DietSheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceReaderError {
    #[error("Empty spreadsheet buffer: '{0}'")]
    EmptyBufferError(String),
}

/// A reader over spreadsheet bytes, either streamed from disk or already in memory
pub(crate) enum SourceReader {
    /// Local file reader
    Local(BufReader<File>),
    /// In-memory buffer
    Memory(Cursor<Vec<u8>>),
}

impl SourceReader {
    /// Opens a local spreadsheet file
    pub(crate) fn open(path: &Path) -> Result<SourceReader, DietSheetError> {
        let file = File::open(path)?;
        Ok(SourceReader::Local(BufReader::new(file)))
    }

    /// Wraps spreadsheet bytes that were loaded elsewhere; `name` is only used in error messages
    pub(crate) fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<SourceReader, DietSheetError> {
        if bytes.is_empty() {
            Err(SourceReaderError::EmptyBufferError(name.to_owned()))?;
        }
        Ok(SourceReader::Memory(Cursor::new(bytes)))
    }

    /// Reads the first bytes of the source and rewinds, used for format sniffing
    pub(crate) fn peek(&mut self, buffer: &mut [u8]) -> Result<usize, DietSheetError> {
        let mut filled = 0;
        while filled < buffer.len() {
            let read = self.read(&mut buffer[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        self.rewind()?;
        Ok(filled)
    }
}

impl Read for SourceReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            SourceReader::Local(reader) => reader.read(buf),
            SourceReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for SourceReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            SourceReader::Local(reader) => reader.seek(pos),
            SourceReader::Memory(reader) => reader.seek(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_local_file() {
        // Cargo.toml exists relative to the crate root when tests run
        let result = SourceReader::open(Path::new("Cargo.toml"));
        assert!(result.is_ok(), "Failed to open local file: {:?}", result.err());

        let result = SourceReader::open(Path::new("non_existent_file.xlsx"));
        assert!(result.is_err(), "Should fail to open non-existent file");
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        assert!(SourceReader::from_bytes("empty.xlsx", Vec::new()).is_err());
    }

    #[test]
    fn test_peek_rewinds() {
        let mut reader = SourceReader::from_bytes("memory", b"PK\x03\x04rest".to_vec()).unwrap();
        let mut magic = [0u8; 4];
        assert_eq!(reader.peek(&mut magic).unwrap(), 4);
        assert_eq!(&magic, b"PK\x03\x04");

        let mut all = Vec::new();
        reader.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"PK\x03\x04rest");
    }
}

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Columns the portfolio service requires in an uploaded transactions CSV
pub const REQUIRED_COLUMNS: [&str; 7] = ["date", "ticker", "action", "shares", "price", "amount", "notes"];

#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a .csv file")]
    NotCsv(String),
    #[error("{file} is missing columns: {}", .missing.join(", "))]
    MissingColumns { file: String, missing: Vec<String> },
    #[error("{file} has no readable header row: {source}")]
    Header {
        file: String,
        #[source]
        source: csv::Error,
    },
}

/// A transactions CSV selected for upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    file_name: String,
    contents: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> UploadFile {
        UploadFile {
            file_name: file_name.into(),
            contents,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<UploadFile, FileError> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|source| FileError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(UploadFile::new(file_name, contents))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Checks the rules the service applies on upload, so a bad file is
    /// rejected before any request is made. Both the extension and the column
    /// names must match exactly.
    pub fn preflight(&self) -> Result<(), FileError> {
        if !self.file_name.ends_with(".csv") {
            return Err(FileError::NotCsv(self.file_name.clone()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(self.contents.as_slice());

        let headers = reader.headers().map_err(|source| FileError::Header {
            file: self.file_name.clone(),
            source,
        })?;

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|h| h == **column))
            .map(|column| column.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(FileError::MissingColumns {
                file: self.file_name.clone(),
                missing,
            });
        }

        Ok(())
    }

    /// Encodes the file as a `multipart/form-data` body with a single `file`
    /// field
    pub(crate) fn multipart_body(&self, boundary: &str) -> Vec<u8> {
        let file_name = self.file_name.replace('"', "%22");

        let mut body = Vec::with_capacity(self.contents.len() + 256);
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
        body.extend_from_slice(&self.contents);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        body
    }
}

pub(crate) fn multipart_content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={}", boundary)
}

//! CSV file intake.
//!
//! Thin wrapper around the `csv` crate that turns a registrant file into raw
//! header-to-value rows for the resolver. Header spelling is left untouched
//! apart from stripping a UTF-8 BOM; dialect handling belongs to the
//! resolver, not the reader.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::AppError;
use crate::validation::RawRow;

/// Reads a CSV file into raw rows.
///
/// The first line is treated as the header. Fully empty records are skipped,
/// matching typical form-export behavior.
///
/// # Errors
///
/// Returns `AppError::CsvInvalid` when the file cannot be opened, has no
/// header row, or contains malformed CSV (for example inconsistent column
/// counts).
pub async fn read_rows(path: &Path) -> Result<Vec<RawRow>, AppError> {
    let path: PathBuf = path.to_owned();

    tokio::task::spawn_blocking(move || read_rows_blocking(&path))
        .await
        .map_err(|e| AppError::Internal(format!("CSV read task failed: {e}")))?
}

/// Blocking implementation of CSV intake.
fn read_rows_blocking(path: &Path) -> Result<Vec<RawRow>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| AppError::CsvInvalid(format!("Failed to open CSV file: {e}")))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::CsvInvalid(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet exports often carry a BOM on the first header.
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::CsvInvalid("CSV file has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::CsvInvalid(format!("Failed to read CSV record: {e}")))?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &[u8]) -> PathBuf {
        let path = dir.path().join("test.csv");
        fs::write(&path, content).expect("Failed to write test CSV");
        path
    }

    #[tokio::test]
    async fn reads_headers_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            b"email,firstName,lastName,phoneNumber\na@example.com,A,B,1\nb@example.com,C,D,2\n",
        );

        let rows = read_rows(&path).await.expect("read");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["email"], "a@example.com");
        assert_eq!(rows[0]["firstName"], "A");
        assert_eq!(rows[1]["lastName"], "D");
    }

    #[tokio::test]
    async fn strips_bom_from_first_header() {
        let dir = TempDir::new().unwrap();
        let mut content = Vec::new();
        content.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        content.extend_from_slice(b"email,firstName\na@example.com,A\n");
        let path = write_csv(&dir, &content);

        let rows = read_rows(&path).await.expect("read");

        assert_eq!(rows.len(), 1);
        assert!(
            rows[0].contains_key("email"),
            "BOM should be stripped from the first header: {:?}",
            rows[0].keys().collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn skips_fully_empty_records() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, b"email,firstName\na@example.com,A\n,\nb@example.com,B\n");

        let rows = read_rows(&path).await.expect("read");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["email"], "b@example.com");
    }

    #[tokio::test]
    async fn header_only_file_yields_no_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, b"email,firstName,lastName,phoneNumber\n");

        let rows = read_rows(&path).await.expect("read");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn empty_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, b"");

        let err = read_rows(&path).await.expect_err("should fail");
        assert!(matches!(err, AppError::CsvInvalid(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn inconsistent_columns_are_invalid() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, b"email,firstName\na@example.com,A,extra\n");

        let err = read_rows(&path).await.expect_err("should fail");
        assert!(matches!(err, AppError::CsvInvalid(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn missing_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.csv");

        let err = read_rows(&path).await.expect_err("should fail");
        assert!(matches!(err, AppError::CsvInvalid(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn quoted_fields_with_commas_survive() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            b"email,collegeName\na@example.com,\"Acme College, Dept. of CS\"\n",
        );

        let rows = read_rows(&path).await.expect("read");
        assert_eq!(rows[0]["collegeName"], "Acme College, Dept. of CS");
    }
}

//! JSON Lines output for extracted records

use crate::extract::ImageRecord;
use crate::{Result, ScrapeError};
use std::io::Write;
use std::path::Path;

/// Serializes records to JSON Lines, one record per line
pub fn records_to_jsonl(records: &[ImageRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| ScrapeError::Output(format!("Failed to serialize record: {}", e)))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Writes records to a JSON Lines file, replacing any existing content
///
/// # Arguments
///
/// * `records` - The records to write
/// * `path` - Destination file path
pub fn write_records(records: &[ImageRecord], path: &Path) -> Result<()> {
    let content = records_to_jsonl(records)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_to_jsonl_one_line_per_record() {
        let records = vec![
            ImageRecord::new().with("src", "a.jpg"),
            ImageRecord::new().with("src", "b.jpg").with("title", "B"),
        ];

        let jsonl = records_to_jsonl(&records).unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"src":"a.jpg"}"#);
        assert_eq!(lines[1], r#"{"src":"b.jpg","title":"B"}"#);
    }

    #[test]
    fn test_empty_records_empty_output() {
        assert_eq!(records_to_jsonl(&[]).unwrap(), "");
    }

    #[test]
    fn test_write_records_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let records = vec![ImageRecord::new().with("src", "a.jpg")];

        write_records(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"src\":\"a.jpg\"}\n");
    }
}

use std::path::Path;

use crate::error::AppError;
use crate::models::record::JobRecord;

/// Canonical column names of the merged output file.
pub const OUTPUT_HEADER: [&str; 7] = [
    "Source",
    "Title",
    "Company",
    "Location",
    "Posted Time",
    "Job Link",
    "Collected At",
];

/// Write the merged dataset, replacing any previous output. The header is
/// written explicitly so an empty merge still produces a valid file.
pub fn write_merged(path: &Path, records: &[JobRecord]) -> Result<(), AppError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(OUTPUT_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_merge_still_writes_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_merged(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Source,Title,Company,Location,Posted Time,Job Link,Collected At\n"
        );
    }

    #[test]
    fn fields_with_delimiters_and_quotes_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let record = JobRecord::normalize(
            "reed",
            "Dev, Senior",
            "Acme \"UK\" Ltd",
            "London",
            "2d ago",
            "http://a/1",
            "",
        );
        write_merged(&path, &[record]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Dev, Senior\""));
        assert!(text.contains("\"Acme \"\"UK\"\" Ltd\""));
    }

    #[test]
    fn write_failure_is_fatal() {
        let missing_dir = Path::new("/definitely/not/here/out.csv");
        assert!(write_merged(missing_dir, &[]).is_err());
    }
}

// Merge scraped CSV exports into one deduplicated canonical dataset.
//
// Inputs are described by a closed set of shapes (InputKind). The planner
// maps known file names onto shapes up front, so the readers themselves
// never sniff names or guess.

mod reader;
mod writer;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::record::JobRecord;

/// File written by the engine-panel scraper (five leading data columns).
pub const ENGINE_EXPORT: &str = "google_jobs.csv";
/// File written by the job-board scraper (six columns, source first).
pub const BOARD_EXPORT: &str = "jobs_indeed_reed.csv";
/// Name prefix of dated batch files, `data_DD-Mon-YYYY.csv`.
pub const BATCH_PREFIX: &str = "data_";
/// Default name of the merged output file.
pub const MERGED_OUTPUT: &str = "jobs_all.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// title, company, location, posted time, link; extra columns ignored.
    EngineExport,
    /// source, title, company, location, posted time, link.
    BoardExport,
    /// label, sequence number, title, company, location, posted time, link,
    /// with the collection date encoded in the file name.
    DatedBatch,
}

/// One candidate input: where it lives and which reader applies.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub kind: InputKind,
}

pub struct MergeOutcome {
    /// Deduplicated records, earliest occurrence first.
    pub records: Vec<JobRecord>,
    /// Rows read across all inputs before deduplication.
    pub total_rows: usize,
}

/// Enumerate candidate inputs: the two fixed exports first, then any dated
/// batch files found in the data dir, sorted by name. The order is load
/// bearing: it decides which copy of a duplicate survives.
pub fn plan_inputs(data_dir: &Path) -> Vec<InputFile> {
    let mut inputs = vec![
        InputFile {
            path: data_dir.join(ENGINE_EXPORT),
            kind: InputKind::EngineExport,
        },
        InputFile {
            path: data_dir.join(BOARD_EXPORT),
            kind: InputKind::BoardExport,
        },
    ];

    let mut batches = Vec::new();
    if let Ok(entries) = std::fs::read_dir(data_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(BATCH_PREFIX) && name.ends_with(".csv") {
                batches.push(entry.path());
            }
        }
    }
    batches.sort();

    inputs.extend(batches.into_iter().map(|path| InputFile {
        path,
        kind: InputKind::DatedBatch,
    }));
    inputs
}

/// Read every input in order and keep the first record seen for each key.
/// A file that cannot be read is reported and skipped; it never aborts the
/// other inputs.
pub fn merge_inputs(inputs: &[InputFile]) -> MergeOutcome {
    let mut combined = Vec::new();
    for input in inputs {
        match reader::read_input(input) {
            Ok(mut records) => combined.append(&mut records),
            Err(e) => tracing::warn!("Failed to read {}: {e}", input.path.display()),
        }
    }

    let total_rows = combined.len();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(total_rows);
    for record in combined {
        if seen.insert(record.dedup_key()) {
            records.push(record);
        }
    }

    MergeOutcome { records, total_rows }
}

/// Whole-batch merge: plan inputs, read, dedup, write the canonical file.
pub fn run(data_dir: &Path, output: &str) -> Result<MergeOutcome, AppError> {
    let inputs = plan_inputs(data_dir);
    let outcome = merge_inputs(&inputs);

    let out_path = data_dir.join(output);
    writer::write_merged(&out_path, &outcome.records)?;

    tracing::info!(
        "Merged {} rows into {} unique rows -> {}",
        outcome.total_rows,
        outcome.records.len(),
        out_path.display()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn plan_orders_fixed_exports_before_sorted_batches() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data_10-Mar-2026.csv", "");
        write(dir.path(), "data_04-Feb-2026.csv", "");
        write(dir.path(), "unrelated.csv", "");

        let inputs = plan_inputs(dir.path());
        let names: Vec<_> = inputs
            .iter()
            .map(|i| i.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                ENGINE_EXPORT,
                BOARD_EXPORT,
                "data_04-Feb-2026.csv",
                "data_10-Mar-2026.csv",
            ]
        );
        assert_eq!(inputs[0].kind, InputKind::EngineExport);
        assert_eq!(inputs[1].kind, InputKind::BoardExport);
        assert_eq!(inputs[2].kind, InputKind::DatedBatch);
    }

    #[test]
    fn missing_inputs_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = merge_inputs(&plan_inputs(dir.path()));
        assert_eq!(outcome.total_rows, 0);
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn first_file_wins_across_inputs() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            ENGINE_EXPORT,
            "Dev,Acme,London,2d ago,http://a/1\n",
        );
        write(
            dir.path(),
            BOARD_EXPORT,
            "reed,Dev,Acme,London,5d ago,http://b/9\n",
        );

        let outcome = merge_inputs(&plan_inputs(dir.path()));
        assert_eq!(outcome.total_rows, 2);
        assert_eq!(outcome.records.len(), 1);
        // The engine export enumerates first, so its copy survives.
        assert_eq!(outcome.records[0].source, "google");
        assert_eq!(outcome.records[0].job_link, "http://a/1");
    }

    #[test]
    fn engine_row_shadows_equal_dated_batch_row() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            ENGINE_EXPORT,
            "Dev,Acme,London,2d ago,http://a/1\n",
        );
        write(
            dir.path(),
            "data_04-Feb-2026.csv",
            "job,1,Dev,Acme,London,2d ago,http://a/1\n",
        );

        let outcome = merge_inputs(&plan_inputs(dir.path()));
        assert_eq!(outcome.total_rows, 2);
        assert_eq!(outcome.records.len(), 1);
        let survivor = &outcome.records[0];
        assert_eq!(survivor.source, "google");
        assert_eq!(survivor.collected_at, "");
    }

    #[test]
    fn dated_batch_alone_carries_its_filename_date() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "data_04-Feb-2026.csv",
            "job,1,Dev,Acme,London,2d ago,http://a/1\n",
        );

        let outcome = merge_inputs(&plan_inputs(dir.path()));
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.source, "job");
        assert_eq!(record.title, "Dev");
        assert_eq!(record.company, "Acme");
        assert_eq!(record.location, "London");
        assert_eq!(record.posted_time, "2d ago");
        assert_eq!(record.job_link, "http://a/1");
        assert_eq!(record.collected_at, "2026-02-04");
    }

    #[test]
    fn run_is_deterministic_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            ENGINE_EXPORT,
            "Title,Company,Location,Posted Time,Job Link\n\
             Dev,Acme,London,2d ago,http://a/1\n\
             QA,Beta,Leeds,1d ago,http://a/2\n",
        );
        write(
            dir.path(),
            BOARD_EXPORT,
            "indeed,Dev,Acme,London,9d ago,http://dupe\n",
        );

        let first = run(dir.path(), MERGED_OUTPUT).unwrap();
        let bytes_a = fs::read(dir.path().join(MERGED_OUTPUT)).unwrap();
        let second = run(dir.path(), MERGED_OUTPUT).unwrap();
        let bytes_b = fs::read(dir.path().join(MERGED_OUTPUT)).unwrap();

        assert_eq!(first.records.len(), 2);
        assert_eq!(second.records.len(), 2);
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn run_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MERGED_OUTPUT, "stale contents that should vanish");
        write(
            dir.path(),
            ENGINE_EXPORT,
            "Dev,Acme,London,2d ago,http://a/1\n",
        );

        run(dir.path(), MERGED_OUTPUT).unwrap();
        let text = fs::read_to_string(dir.path().join(MERGED_OUTPUT)).unwrap();
        assert!(text.starts_with("Source,Title,Company,Location,Posted Time,Job Link,Collected At"));
        assert!(!text.contains("stale"));
    }

    #[test]
    fn merged_output_round_trips_through_serde() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            BOARD_EXPORT,
            "reed,\"Dev, Senior\",\"Acme \"\"UK\"\"\",London,1d ago,http://a/1\n",
        );

        run(dir.path(), MERGED_OUTPUT).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(MERGED_OUTPUT)).unwrap();
        let records: Vec<JobRecord> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Dev, Senior");
        assert_eq!(records[0].company, "Acme \"UK\"");
    }
}

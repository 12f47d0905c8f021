use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use super::{BATCH_PREFIX, InputFile, InputKind};
use crate::error::AppError;
use crate::models::record::{DEFAULT_SOURCE, JobRecord};

/// Read one input file into canonical records. A missing file contributes
/// nothing, and a malformed row drops that row, never the file.
pub fn read_input(input: &InputFile) -> Result<Vec<JobRecord>, AppError> {
    if !input.path.exists() {
        tracing::info!("Skipping missing input {}", input.path.display());
        return Ok(Vec::new());
    }

    let rows = load_rows(&input.path)?;
    let records = match input.kind {
        InputKind::EngineExport => read_engine_export(&rows),
        InputKind::BoardExport => read_board_export(&rows),
        InputKind::DatedBatch => {
            read_dated_batch(&rows, &batch_date_from_name(&input.path))
        }
    };
    tracing::debug!(
        "{}: {} rows -> {} records",
        input.path.display(),
        rows.len(),
        records.len()
    );
    Ok(records)
}

fn load_rows(path: &Path) -> Result<Vec<StringRecord>, AppError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("Dropping unreadable row in {}: {e}", path.display()),
        }
    }
    Ok(rows)
}

/// First-row heuristic: a row naming both "title" and "company" among its
/// cells is a header, anything else is data.
fn looks_like_header(row: &StringRecord) -> bool {
    let has = |name: &str| row.iter().any(|cell| cell.eq_ignore_ascii_case(name));
    has("title") && has("company")
}

/// Rows after an optional header; headerless files start with data.
fn data_rows<'a>(rows: &'a [StringRecord]) -> &'a [StringRecord] {
    match rows.split_first() {
        Some((first, rest)) if looks_like_header(first) => rest,
        _ => rows,
    }
}

/// Engine-panel export: title, company, location, posted time, link.
/// Description columns past the fifth are not carried into the merge.
fn read_engine_export(rows: &[StringRecord]) -> Vec<JobRecord> {
    let mut out = Vec::new();
    for row in data_rows(rows) {
        if row.len() < 5 {
            continue;
        }
        out.push(JobRecord::normalize(
            DEFAULT_SOURCE,
            &row[0],
            &row[1],
            &row[2],
            &row[3],
            &row[4],
            "",
        ));
    }
    out
}

/// Multi-board export: the source name leads each row.
fn read_board_export(rows: &[StringRecord]) -> Vec<JobRecord> {
    let mut out = Vec::new();
    for row in data_rows(rows) {
        if row.len() < 6 {
            continue;
        }
        out.push(JobRecord::normalize(
            &row[0], &row[1], &row[2], &row[3], &row[4], &row[5], "",
        ));
    }
    out
}

/// Dated batch: label, sequence number, then the five data columns. With a
/// header the columns are looked up by name instead; the sequence number is
/// discarded either way.
fn read_dated_batch(rows: &[StringRecord], collected_at: &str) -> Vec<JobRecord> {
    let Some((first, rest)) = rows.split_first() else {
        return Vec::new();
    };

    if !looks_like_header(first) {
        // No header; assume the recorder's tuple order.
        let mut out = Vec::new();
        for row in rows {
            if row.len() < 7 {
                continue;
            }
            out.push(JobRecord::normalize(
                &row[0],
                &row[2],
                &row[3],
                &row[4],
                &row[5],
                &row[6],
                collected_at,
            ));
        }
        return out;
    }

    let find = |names: &[&str]| -> Option<usize> {
        names
            .iter()
            .find_map(|name| first.iter().position(|cell| cell.eq_ignore_ascii_case(name)))
    };

    let (Some(i_title), Some(i_company), Some(i_location)) =
        (find(&["title"]), find(&["company"]), find(&["location"]))
    else {
        return Vec::new();
    };
    let i_source = find(&["source"]);
    let i_posted = find(&["posted time", "posted"]);
    let i_link = find(&["job link", "link"]);

    let mut out = Vec::new();
    for row in rest {
        let (Some(title), Some(company), Some(location)) =
            (row.get(i_title), row.get(i_company), row.get(i_location))
        else {
            continue;
        };
        let optional = |i: Option<usize>| i.and_then(|i| row.get(i)).unwrap_or("");
        out.push(JobRecord::normalize(
            i_source
                .and_then(|i| row.get(i))
                .unwrap_or(DEFAULT_SOURCE),
            title,
            company,
            location,
            optional(i_posted),
            optional(i_link),
            collected_at,
        ));
    }
    out
}

/// Derive the collection date from a `data_DD-Mon-YYYY.csv` file name.
/// Anything that does not match the convention yields an empty date.
fn batch_date_from_name(path: &Path) -> String {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return String::new();
    };
    let Some(stem) = name
        .strip_prefix(BATCH_PREFIX)
        .and_then(|s| s.strip_suffix(".csv"))
    else {
        return String::new();
    };
    match NaiveDate::parse_from_str(stem, "%d-%b-%Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => String::new(),
    }
}

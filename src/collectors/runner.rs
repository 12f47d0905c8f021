// Drives the scrapers end to end: connect a WebDriver session, collect,
// write the per-source export. One source failing never sinks the rest.

use std::path::Path;

use chrono::Local;

use crate::collectors::boards::JobBoards;
use crate::collectors::google::{GoogleCards, GooglePanel};
use crate::collectors::{JobCollector, ScrapedJob, SearchParams, browser};
use crate::config::ScrapeArgs;
use crate::error::AppError;
use crate::merge::{BATCH_PREFIX, BOARD_EXPORT, ENGINE_EXPORT};

fn search_params(args: &ScrapeArgs) -> SearchParams {
    SearchParams {
        query: args.query.clone(),
        locations: args.locations(),
        max_pages: args.max_pages,
        max_jobs: args.max_jobs,
    }
}

/// Collect from one source through a fresh WebDriver session. The session
/// is closed whether or not the collector succeeds.
async fn collect_jobs(
    collector: &dyn JobCollector,
    args: &ScrapeArgs,
) -> Result<Vec<ScrapedJob>, AppError> {
    let driver = browser::connect(&args.webdriver_url).await?;
    let result = collector.collect(&driver, &search_params(args)).await;
    if let Err(e) = driver.quit().await {
        tracing::warn!("Failed to close WebDriver session: {e}");
    }
    result
}

/// Detailed panel scrape into the engine export.
pub async fn scrape_panel(args: &ScrapeArgs, data_dir: &Path) -> Result<(), AppError> {
    let jobs = collect_jobs(&GooglePanel, args).await?;
    let path = data_dir.join(ENGINE_EXPORT);
    write_engine_export(&path, &jobs)?;
    tracing::info!("{} listings -> {}", jobs.len(), path.display());
    Ok(())
}

/// Indeed/Reed scrape into the multi-board export.
pub async fn scrape_boards(args: &ScrapeArgs, data_dir: &Path) -> Result<(), AppError> {
    let jobs = collect_jobs(&JobBoards, args).await?;
    let path = data_dir.join(BOARD_EXPORT);
    write_board_export(&path, &jobs)?;
    tracing::info!("{} listings -> {}", jobs.len(), path.display());
    Ok(())
}

/// Quick panel pass into today's dated batch file.
pub async fn scrape_batch(args: &ScrapeArgs, data_dir: &Path) -> Result<(), AppError> {
    let jobs = collect_jobs(&GoogleCards, args).await?;
    let path = data_dir.join(batch_file_name());
    write_dated_batch(&path, &jobs)?;
    tracing::info!("{} listings -> {}", jobs.len(), path.display());
    Ok(())
}

/// Panel scrape, board scrape, then merge. A failed scraper is reported
/// and the remaining stages still run on whatever files exist.
pub async fn run_all(args: &ScrapeArgs, data_dir: &Path, output: &str) -> Result<(), AppError> {
    if let Err(e) = scrape_panel(args, data_dir).await {
        tracing::error!("Panel scrape failed: {e}");
    }
    if let Err(e) = scrape_boards(args, data_dir).await {
        tracing::error!("Board scrape failed: {e}");
    }
    crate::merge::run(data_dir, output)?;
    Ok(())
}

/// Dated batch file for today, e.g. `data_04-Feb-2026.csv`.
fn batch_file_name() -> String {
    format!("{BATCH_PREFIX}{}.csv", Local::now().format("%d-%b-%Y"))
}

/// Engine export: listing columns first, description columns after. The
/// merge only reads the first five.
fn write_engine_export(path: &Path, jobs: &[ScrapedJob]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "Title",
        "Company",
        "Location",
        "Posted Time",
        "Job Link",
        "Description Snippet",
        "Description Full",
    ])?;
    for job in jobs {
        wtr.write_record([
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            job.posted_time.as_str(),
            job.job_link.as_str(),
            job.description_snippet.as_str(),
            job.description_full.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Multi-board export: source name leads each row.
fn write_board_export(path: &Path, jobs: &[ScrapedJob]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "Source",
        "Title",
        "Company",
        "Location",
        "Posted Time",
        "Job Link",
    ])?;
    for job in jobs {
        wtr.write_record([
            job.source.as_str(),
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            job.posted_time.as_str(),
            job.job_link.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Dated batch: headerless recorder tuples with a one-based sequence
/// number in the second column.
fn write_dated_batch(path: &Path, jobs: &[ScrapedJob]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for (i, job) in jobs.iter().enumerate() {
        let seq = (i + 1).to_string();
        wtr.write_record([
            job.source.as_str(),
            seq.as_str(),
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            job.posted_time.as_str(),
            job.job_link.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

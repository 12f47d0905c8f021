use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobharvest", about = "Job listing scraper and merge pipeline")]
pub struct Config {
    /// Directory where scraped CSV exports are read and written
    #[arg(long, env = "DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Scrape the search-engine jobs panel into the engine export
    Panel(ScrapeArgs),

    /// Scrape job boards (Indeed, Reed) into the multi-board export
    Boards(ScrapeArgs),

    /// Quick jobs-panel pass into a dated batch file
    Batch(ScrapeArgs),

    /// Merge all scraped exports into one deduplicated dataset
    Merge {
        /// Output file name, relative to the data dir
        #[arg(long, default_value = "jobs_all.csv")]
        output: String,
    },

    /// Run the panel and board scrapers, then merge (default when no
    /// subcommand given)
    Run(ScrapeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// Job title or keywords
    #[arg(long, default_value = "php developer")]
    pub query: String,

    /// Comma-separated job locations (e.g., london,birmingham)
    #[arg(long, default_value = "london,birmingham,coventry,manchester")]
    pub location: String,

    /// Pages per board to scan (Indeed/Reed)
    #[arg(long, default_value = "1")]
    pub max_pages: usize,

    /// Max jobs per location (0 = no limit)
    #[arg(long, default_value = "0")]
    pub max_jobs: usize,

    /// WebDriver endpoint the scrapers connect to
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,
}

impl Config {
    /// Resolve the command, defaulting to Run if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run(ScrapeArgs::default_args()))
    }
}

impl ScrapeArgs {
    fn default_args() -> Self {
        ScrapeArgs {
            query: "php developer".to_string(),
            location: "london,birmingham,coventry,manchester".to_string(),
            max_pages: 1,
            max_jobs: 0,
            webdriver_url: std::env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| "http://localhost:9515".to_string()),
        }
    }

    /// Split the comma-separated location list into trimmed, non-empty parts.
    pub fn locations(&self) -> Vec<String> {
        self.location
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_split_and_trim() {
        let mut args = ScrapeArgs::default_args();
        args.location = " london , ,birmingham,".to_string();
        assert_eq!(args.locations(), vec!["london", "birmingham"]);
    }
}

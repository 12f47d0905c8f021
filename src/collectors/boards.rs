use async_trait::async_trait;
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::collectors::browser::{self, PAGE_LOAD_WAIT};
use crate::collectors::{JobCollector, ScrapedJob, SearchParams, quote_plus};
use crate::error::AppError;

/// Per-site selector table. Every field carries fallback selectors because
/// the boards A/B-test their result markup.
struct BoardSpec {
    name: &'static str,
    base_url: &'static str,
    card_selectors: &'static [&'static str],
    title: &'static [&'static str],
    company: &'static [&'static str],
    location: &'static [&'static str],
    posted_time: &'static [&'static str],
    link: &'static [&'static str],
}

const BOARDS: &[BoardSpec] = &[
    BoardSpec {
        name: "indeed",
        base_url: "https://www.indeed.com",
        card_selectors: &[".job_seen_beacon", ".result"],
        title: &["h2.jobTitle", "a.jcs-JobTitle"],
        company: &["span.companyName"],
        location: &["div.companyLocation"],
        posted_time: &["span.date"],
        link: &["a.jcs-JobTitle"],
    },
    BoardSpec {
        name: "reed",
        base_url: "https://www.reed.co.uk",
        card_selectors: &["article.job-result", "li.job-result"],
        title: &["h2.job-result-heading__title", "h2.job-result__title"],
        company: &["a.job-result-heading__company", "span.job-result__company"],
        location: &["span.job-result-heading__location", "span.job-result__location"],
        posted_time: &["span.job-result-heading__date", "span.job-result__date"],
        link: &["a.job-result-heading__title", "a.job-result__title"],
    },
];

/// Search URL for one board page. Indeed paginates by result offset, Reed
/// by one-based page number.
fn search_url(board: &BoardSpec, query: &str, location: &str, page_index: usize) -> String {
    let q = quote_plus(query);
    let loc = quote_plus(location);
    match board.name {
        "indeed" => format!(
            "{}/jobs?q={q}&l={loc}&start={}",
            board.base_url,
            page_index * 10
        ),
        _ => format!(
            "{}/jobs/{q}-jobs-in-{loc}?p={}",
            board.base_url,
            page_index + 1
        ),
    }
}

/// Make board links absolute; cards often carry site-relative hrefs.
fn normalize_link(base_url: &str, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix('/') {
        return format!("{base_url}/{rest}");
    }
    format!("{base_url}/{href}")
}

pub struct JobBoards;

#[async_trait]
impl JobCollector for JobBoards {
    fn name(&self) -> &str {
        "boards"
    }

    async fn collect(
        &self,
        driver: &WebDriver,
        params: &SearchParams,
    ) -> Result<Vec<ScrapedJob>, AppError> {
        // Board searches take a single location; use the first configured one.
        let location = params.locations.first().cloned().unwrap_or_default();

        let mut jobs = Vec::new();
        for board in BOARDS {
            for page_index in 0..params.max_pages {
                let url = search_url(board, &params.query, &location, page_index);
                tracing::info!("[{}] page={} url={url}", board.name, page_index + 1);
                driver.goto(&url).await?;
                sleep(PAGE_LOAD_WAIT).await;

                let cards = find_cards(driver, board).await?;
                tracing::info!("[{}] page={} cards={}", board.name, page_index + 1, cards.len());
                for card in &cards {
                    jobs.push(read_card(board, card).await);
                }
            }
        }
        Ok(jobs)
    }
}

/// Result cards under whichever card selector matches this board today.
async fn find_cards(driver: &WebDriver, board: &BoardSpec) -> WebDriverResult<Vec<WebElement>> {
    for &sel in board.card_selectors {
        let cards = driver.find_all(By::Css(sel)).await?;
        if !cards.is_empty() {
            return Ok(cards);
        }
    }
    Ok(Vec::new())
}

async fn read_card(board: &BoardSpec, card: &WebElement) -> ScrapedJob {
    let title = browser::safe_text(first_by_css(card, board.title).await.as_ref()).await;
    let company = browser::safe_text(first_by_css(card, board.company).await.as_ref()).await;
    let location = browser::safe_text(first_by_css(card, board.location).await.as_ref()).await;
    let posted_time =
        browser::safe_text(first_by_css(card, board.posted_time).await.as_ref()).await;
    let href = browser::safe_attr(first_by_css(card, board.link).await.as_ref(), "href").await;

    ScrapedJob {
        source: board.name.to_string(),
        title,
        company,
        location,
        posted_time,
        job_link: normalize_link(board.base_url, &href),
        ..Default::default()
    }
}

async fn first_by_css(card: &WebElement, selectors: &[&str]) -> Option<WebElement> {
    let by_list: Vec<By> = selectors.iter().map(|&s| By::Css(s)).collect();
    browser::first_in(card, &by_list).await
}

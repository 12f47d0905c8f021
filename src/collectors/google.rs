use async_trait::async_trait;
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::collectors::browser::{self, CLICK_WAIT, PAGE_LOAD_WAIT};
use crate::collectors::{JobCollector, ScrapedJob, SearchParams, quote_plus};
use crate::error::AppError;

const CARD_SELECTOR: &str = "//div[contains(@class,'GoEOPd')]";

/// Search URL for the engine's jobs panel.
fn panel_search_url(query: &str, location: &str) -> String {
    let q = quote_plus(format!("{query} jobs {location}").trim());
    format!("https://www.google.com/search?q={q}&jbr=sep:0&udm=8")
}

/// Detailed panel collector: opens every card and pulls the description
/// pane along with the listing fields.
pub struct GooglePanel;

/// Quick card pass: listing fields only, labelled for the dated batch file.
pub struct GoogleCards;

#[async_trait]
impl JobCollector for GooglePanel {
    fn name(&self) -> &str {
        "google"
    }

    async fn collect(
        &self,
        driver: &WebDriver,
        params: &SearchParams,
    ) -> Result<Vec<ScrapedJob>, AppError> {
        let mut jobs = Vec::new();
        for location in &params.locations {
            let cards = load_cards(driver, &params.query, location).await?;
            let mut count = 0usize;
            for card in &cards {
                if params.max_jobs > 0 && count >= params.max_jobs {
                    tracing::info!(
                        "[google] location={location} reached max_jobs={}",
                        params.max_jobs
                    );
                    break;
                }
                match scrape_card_detail(driver, card).await {
                    Ok(job) => {
                        jobs.push(job);
                        count += 1;
                    }
                    Err(e) => tracing::debug!("Skipping card: {e}"),
                }
            }
        }
        Ok(jobs)
    }
}

#[async_trait]
impl JobCollector for GoogleCards {
    fn name(&self) -> &str {
        "job"
    }

    async fn collect(
        &self,
        driver: &WebDriver,
        params: &SearchParams,
    ) -> Result<Vec<ScrapedJob>, AppError> {
        let mut jobs = Vec::new();
        for location in &params.locations {
            let cards = load_cards(driver, &params.query, location).await?;
            for card in &cards {
                match scrape_card(card, self.name()).await {
                    Ok(job) => jobs.push(job),
                    Err(e) => tracing::debug!("Skipping card: {e}"),
                }
            }
        }
        Ok(jobs)
    }
}

/// Load the panel results for one location and return its job cards.
async fn load_cards(
    driver: &WebDriver,
    query: &str,
    location: &str,
) -> Result<Vec<WebElement>, AppError> {
    let url = panel_search_url(query, location);
    tracing::info!("[google] location={location} url={url}");
    driver.goto(&url).await?;
    sleep(PAGE_LOAD_WAIT).await;

    let cards = driver.find_all(By::XPath(CARD_SELECTOR)).await?;
    tracing::info!("[google] location={location} cards={}", cards.len());
    Ok(cards)
}

/// Open a card and read its listing fields.
async fn scrape_card(card: &WebElement, source: &str) -> WebDriverResult<ScrapedJob> {
    match browser::first_in(card, &[By::XPath(".//*[contains(@class,'tNxQIb')]")]).await {
        Some(target) => target.click().await?,
        None => card.click().await?,
    }
    sleep(CLICK_WAIT).await;

    let title = browser::safe_text(
        browser::first_in(card, &[By::XPath("./div"), By::XPath(".//div")])
            .await
            .as_ref(),
    )
    .await;
    let company = browser::safe_text(
        browser::first_in(card, &[By::XPath(".//*[contains(@class,'waQ7qe')]")])
            .await
            .as_ref(),
    )
    .await;
    let location = browser::safe_text(
        browser::first_in(card, &[By::XPath(".//*[contains(@class,'mLdNec')]")])
            .await
            .as_ref(),
    )
    .await;
    let posted_time = browser::safe_text(
        browser::first_in(card, &[By::XPath(".//*[contains(@class,'RcZtZb')]")])
            .await
            .as_ref(),
    )
    .await;
    let job_link = browser::safe_attr(
        browser::first_in(card, &[By::XPath(".//a[@href]")])
            .await
            .as_ref(),
        "href",
    )
    .await;

    Ok(ScrapedJob {
        source: source.to_string(),
        title,
        company,
        location,
        posted_time,
        job_link,
        ..Default::default()
    })
}

/// Card fields plus the right-hand detail pane descriptions.
async fn scrape_card_detail(
    driver: &WebDriver,
    card: &WebElement,
) -> WebDriverResult<ScrapedJob> {
    let mut job = scrape_card(card, "google").await?;

    // Expand the pane first; the button is absent once already expanded.
    browser::click_by_text(driver, &["Show full description"]).await;
    sleep(CLICK_WAIT).await;

    job.description_snippet = browser::safe_text(
        browser::first_on(
            driver,
            &[By::Css(".HBvzbc"), By::Css(".K7O2sd"), By::Css(".GYM22b")],
        )
        .await
        .as_ref(),
    )
    .await;
    job.description_full = browser::safe_text(
        browser::first_on(
            driver,
            &[
                By::Css("#jobDescriptionText"),
                By::Css(".K7O2sd"),
                By::Css(".HBvzbc"),
            ],
        )
        .await
        .as_ref(),
    )
    .await;

    if job.description_full.is_empty() {
        job.description_full = description_by_heading(
            driver,
            &[
                "Job description",
                "Description",
                "Responsibilities",
                "About the job",
            ],
        )
        .await;
    }

    Ok(job)
}

/// Locate the description through a nearby heading when the pane markup
/// matches none of the known classes.
async fn description_by_heading(driver: &WebDriver, headings: &[&str]) -> String {
    for heading_text in headings {
        let exact = format!("//*[normalize-space()='{heading_text}']");
        let partial = format!("//*[contains(normalize-space(), '{heading_text}')]");

        let mut heading = driver.find(By::XPath(&exact)).await.ok();
        if heading.is_none() {
            heading = driver.find(By::XPath(&partial)).await.ok();
        }
        let Some(heading) = heading else { continue };

        for rel in [
            "./following-sibling::*[1]",
            "./following::*[1]",
            "./parent::*",
        ] {
            if let Ok(ele) = heading.find(By::XPath(rel)).await {
                let text = browser::clean_text(&ele.text().await.unwrap_or_default());
                if text.len() > 20 {
                    return text;
                }
            }
        }
    }
    String::new()
}

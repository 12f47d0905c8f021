use std::time::Duration;

use thirtyfour::prelude::*;

use crate::error::AppError;

/// Settle time after loading a results page.
pub const PAGE_LOAD_WAIT: Duration = Duration::from_secs(3);
/// Pause after clicking a job card so the detail pane can render.
pub const CLICK_WAIT: Duration = Duration::from_millis(200);

/// Connect to the WebDriver endpoint with headless Chrome capabilities.
pub async fn connect(webdriver_url: &str) -> Result<WebDriver, AppError> {
    let mut caps = DesiredCapabilities::chrome();
    caps.add_chrome_option(
        "args",
        vec![
            "--headless=new",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--window-size=1920,1080",
        ],
    )?;

    let driver = WebDriver::new(webdriver_url, caps).await?;
    Ok(driver)
}

/// First element under `scope` matching any selector in the list.
pub async fn first_in(scope: &WebElement, selectors: &[By]) -> Option<WebElement> {
    for by in selectors {
        if let Ok(ele) = scope.find(by.clone()).await {
            return Some(ele);
        }
    }
    None
}

/// First element on the page matching any selector in the list.
pub async fn first_on(driver: &WebDriver, selectors: &[By]) -> Option<WebElement> {
    for by in selectors {
        if let Ok(ele) = driver.find(by.clone()).await {
            return Some(ele);
        }
    }
    None
}

/// Element text with collapsed whitespace; empty when the element is absent.
pub async fn safe_text(ele: Option<&WebElement>) -> String {
    match ele {
        Some(e) => clean_text(&e.text().await.unwrap_or_default()),
        None => String::new(),
    }
}

/// Attribute value, or empty when the element or attribute is absent.
pub async fn safe_attr(ele: Option<&WebElement>, name: &str) -> String {
    match ele {
        Some(e) => e.attr(name).await.ok().flatten().unwrap_or_default(),
        None => String::new(),
    }
}

/// Click the first element whose visible text matches one of `texts`.
/// Returns whether anything was clicked.
pub async fn click_by_text(driver: &WebDriver, texts: &[&str]) -> bool {
    for t in texts {
        let selectors = [
            format!("//*[normalize-space()='{t}']"),
            format!("//*[contains(., '{t}')]"),
        ];
        for sel in &selectors {
            if let Ok(ele) = driver.find(By::XPath(sel)).await {
                if ele.click().await.is_ok() {
                    return true;
                }
            }
        }
    }
    false
}

/// Collapse runs of whitespace into single spaces.
pub fn clean_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  PHP   Developer\n London "), "PHP Developer London");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \t\n"), "");
    }
}

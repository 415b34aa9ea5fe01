pub mod classify;
pub mod model;
pub mod review;

use crate::config::ReviewConfig;
use crate::error::{Error, Result};
use crate::services::page::selectors;
use crate::services::page::webdriver::WebDriverPage;
use crate::services::page::PhotoPage;

/// Connects to the browser and enforces the context gate: the active page
/// must be a Google Photos single-photo view, otherwise nothing here has
/// anything to operate on.
pub async fn open_photo_page(config: &ReviewConfig) -> Result<WebDriverPage> {
    let page = WebDriverPage::connect(
        &config.webdriver_url,
        config.chrome_debugger_address.as_deref(),
    )
    .await?;

    let url = page.current_url().await?;
    if !selectors::is_photo_view(&url) {
        let _ = page.close().await;
        return Err(Error::InvalidContext(format!(
            "Active page is not a single-photo view: {} (open a photo in Google Photos first)",
            url
        )));
    }
    Ok(page)
}

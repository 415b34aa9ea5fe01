use crate::error::{Error, Result};
use crate::services::page::{Dispatch, PhotoPage};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// W3C WebDriver element identifier key.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// In-page scan for the photo on display. Mirrors what a human sees:
/// rendered size, not display:none / visibility:hidden / opacity:0, and at
/// least partially inside the viewport. Among visible matches the one with
/// the greatest rendered area wins, so overlapping thumbnails lose to the
/// main photo.
const VISIBLE_PHOTO_SCRIPT: &str = r#"
const candidates = Array.from(document.querySelectorAll(arguments[0]));
const vw = window.innerWidth || document.documentElement.clientWidth;
const vh = window.innerHeight || document.documentElement.clientHeight;
let best = null;
let bestArea = 0;
for (const img of candidates) {
    const rect = img.getBoundingClientRect();
    const style = window.getComputedStyle(img);
    const visible =
        rect.width > 0 &&
        rect.height > 0 &&
        style.display !== 'none' &&
        style.visibility !== 'hidden' &&
        style.opacity !== '0' &&
        rect.bottom > 0 &&
        rect.right > 0 &&
        rect.top < vh &&
        rect.left < vw;
    if (!visible) continue;
    const area = rect.width * rect.height;
    if (area > bestArea) {
        bestArea = area;
        best = img;
    }
}
return best ? best.src : null;
"#;

#[derive(Deserialize)]
struct WdResponse<T> {
    value: T,
}

#[derive(Deserialize)]
struct NewSessionValue {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Deserialize)]
struct WdErrorValue {
    error: String,
    message: String,
}

/// `PhotoPage` implementation speaking the W3C WebDriver protocol over
/// HTTP to a driver such as chromedriver.
///
/// With `debugger_address` set, the session attaches to an already running
/// Chrome (the one holding the user's Google Photos login) instead of
/// launching a fresh profile.
pub struct WebDriverPage {
    client: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl WebDriverPage {
    pub async fn connect(base_url: &str, debugger_address: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::new();

        let mut chrome_options = serde_json::Map::new();
        if let Some(addr) = debugger_address {
            chrome_options.insert("debuggerAddress".to_string(), json!(addr));
        }
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "goog:chromeOptions": chrome_options,
                }
            }
        });

        let response = client
            .post(format!("{}/session", base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Page(format!("Cannot reach WebDriver at {}: {}", base_url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Page(format!(
                "WebDriver session refused: HTTP {}",
                response.status()
            )));
        }

        let session: WdResponse<NewSessionValue> = response
            .json()
            .await
            .map_err(|e| Error::Page(format!("Malformed session response: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            session_id: session.value.session_id,
        })
    }

    /// Ends the WebDriver session. The browser itself stays open when
    /// attached via `debugger_address`.
    pub async fn close(self) -> Result<()> {
        self.client
            .delete(format!("{}/session/{}", self.base_url, self.session_id))
            .send()
            .await
            .map_err(|e| Error::Page(format!("Failed to end session: {}", e)))?;
        Ok(())
    }

    fn session_url(&self, path: &str) -> String {
        format!("{}/session/{}/{}", self.base_url, self.session_id, path)
    }

    async fn execute(&self, script: &str, args: Vec<serde_json::Value>) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(self.session_url("execute/sync"))
            .json(&json!({ "script": script, "args": args }))
            .send()
            .await
            .map_err(|e| Error::Page(format!("Script execution failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Page(wd_error_text(response).await));
        }

        let result: WdResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| Error::Page(format!("Malformed script response: {}", e)))?;
        Ok(result.value)
    }

    /// Finds the first element matching `selector`. `Ok(None)` when the
    /// driver reports "no such element".
    async fn find_element(&self, selector: &str) -> Result<Option<String>> {
        let response = self
            .client
            .post(self.session_url("element"))
            .json(&json!({ "using": "css selector", "value": selector }))
            .send()
            .await
            .map_err(|e| Error::Page(format!("Element lookup failed: {}", e)))?;

        // "no such element" also comes back as 404, which must read as an
        // absent control rather than a transport failure.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            let status = response.status();
            return match response.json::<WdResponse<WdErrorValue>>().await {
                Ok(body) if body.value.error == "no such element" => Ok(None),
                Ok(body) => Err(Error::Page(format!(
                    "WebDriver {}: {}",
                    body.value.error, body.value.message
                ))),
                Err(_) => Err(Error::Page(format!(
                    "WebDriver request failed: HTTP {}",
                    status
                ))),
            };
        }
        if !response.status().is_success() {
            return Err(Error::Page(wd_error_text(response).await));
        }

        let found: WdResponse<serde_json::Map<String, serde_json::Value>> = response
            .json()
            .await
            .map_err(|e| Error::Page(format!("Malformed element response: {}", e)))?;

        Ok(found
            .value
            .get(ELEMENT_KEY)
            .and_then(|v| v.as_str())
            .map(|id| id.to_string()))
    }
}

async fn wd_error_text(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<WdResponse<WdErrorValue>>().await {
        Ok(body) => format!("WebDriver {}: {}", body.value.error, body.value.message),
        Err(_) => format!("WebDriver request failed: HTTP {}", status),
    }
}

#[async_trait]
impl PhotoPage for WebDriverPage {
    async fn current_url(&self) -> Result<String> {
        let response = self
            .client
            .get(self.session_url("url"))
            .send()
            .await
            .map_err(|e| Error::Page(format!("URL query failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Page(wd_error_text(response).await));
        }

        let url: WdResponse<String> = response
            .json()
            .await
            .map_err(|e| Error::Page(format!("Malformed URL response: {}", e)))?;
        Ok(url.value)
    }

    async fn visible_photo_url(&self) -> Result<Option<String>> {
        let value = self
            .execute(VISIBLE_PHOTO_SCRIPT, vec![json!(super::selectors::PHOTO_IMAGE)])
            .await?;
        Ok(value.as_str().map(|s| s.to_string()))
    }

    async fn click(&self, selector: &str) -> Result<Dispatch> {
        let element_id = match self.find_element(selector).await? {
            Some(id) => id,
            None => return Ok(Dispatch::NoTarget),
        };

        let response = self
            .client
            .post(self.session_url(&format!("element/{}/click", element_id)))
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| Error::Page(format!("Click failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Page(wd_error_text(response).await));
        }
        Ok(Dispatch::Clicked)
    }
}

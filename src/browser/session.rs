//! Browser session shared by every crawl component

use crate::browser::{BrowserDriver, BrowserError, BrowserResult};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// One browser page plus the rules for loading documents into it
///
/// `load_page` holds an internal lock for its whole duration, so page loads
/// never interleave. `evaluate` does not take the lock; concurrent hover
/// probes evaluate against the page that is currently loaded.
pub struct BrowserSession {
    driver: Arc<dyn BrowserDriver>,
    ready_selector: String,
    navigation: Mutex<()>,
}

impl BrowserSession {
    /// Creates a session over `driver`
    ///
    /// # Arguments
    ///
    /// * `driver` - The browser backend
    /// * `ready_selector` - Selector that must be visible before a page counts as loaded
    pub fn new(driver: Arc<dyn BrowserDriver>, ready_selector: impl Into<String>) -> Self {
        Self {
            driver,
            ready_selector: ready_selector.into(),
            navigation: Mutex::new(()),
        }
    }

    /// Loads `url` and returns its rendered markup
    ///
    /// Navigates, waits for the ready selector and captures the outer HTML.
    /// The whole sequence must finish within `timeout`; otherwise
    /// [`BrowserError::Timeout`] is returned.
    pub async fn load_page(&self, url: &str, timeout: Duration) -> BrowserResult<String> {
        let _guard = self.navigation.lock().await;
        let started = Instant::now();

        let load = async {
            self.driver.navigate(url).await?;
            self.driver
                .wait_visible(&self.ready_selector, timeout)
                .await?;
            self.driver.outer_html().await
        };

        let html = match tokio::time::timeout(timeout, load).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BrowserError::Timeout {
                    waiting_for: url.to_string(),
                    timeout,
                })
            }
        };

        tracing::debug!(
            url,
            elapsed_ms = started.elapsed().as_millis() as u64,
            html_len = html.len(),
            "Page loaded"
        );

        Ok(html)
    }

    /// Evaluates a function declaration in the current page with bound arguments
    pub async fn evaluate(&self, function: &str, args: Vec<Value>) -> BrowserResult<Value> {
        self.driver.evaluate(function, args).await
    }

    /// Evaluates a function and decodes its result into `T`
    pub async fn evaluate_as<T>(&self, function: &str, args: Vec<Value>) -> BrowserResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = self.evaluate(function, args).await?;
        serde_json::from_value(value)
            .map_err(|e| BrowserError::Evaluation(format!("unexpected script result: {}", e)))
    }
}

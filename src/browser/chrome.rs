//! Chrome backend over the DevTools protocol

use crate::browser::{BrowserDriver, BrowserError, BrowserResult};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::js_protocol::runtime::{CallArgument, CallFunctionOnParams};
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::fmt::Display;
use std::pin::pin;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Interval between two readiness checks in `wait_visible`
const VISIBILITY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Returns true when the first element matching the selector is rendered
const ELEMENT_VISIBLE: &str = r#"function(selector) {
    const el = document.querySelector(selector);
    if (!el) {
        return false;
    }
    const style = window.getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden') {
        return false;
    }
    const rect = el.getBoundingClientRect();
    return rect.width > 0 || rect.height > 0;
}"#;

/// A single Chrome page driven over CDP
///
/// The browser process lives as long as this value; dropping it stops the
/// event handler task and kills the child process.
pub struct ChromeDriver {
    _browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeDriver {
    /// Launches Chrome and opens one blank page
    pub async fn launch(config: &BrowserConfig) -> BrowserResult<Self> {
        let mut builder = ChromeConfig::builder()
            .arg(format!("--user-agent={}", config.user_agent));

        for arg in &config.args {
            builder = builder.arg(arg.as_str());
        }

        if !config.headless {
            builder = builder.with_head();
        }

        let chrome_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler stream drives the CDP connection and must be polled
        // for as long as the browser is in use.
        let handler = tokio::spawn(async move {
            let errors = drive_handler(handler).await;
            tracing::debug!(errors, "Browser connection closed");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(format!("failed to open page: {}", e)))?;

        tracing::info!(headless = config.headless, "Browser launched");

        Ok(Self {
            _browser: browser,
            page,
            handler,
        })
    }
}

/// Polls CDP events until the connection closes
///
/// An error on a single event (an event type this client cannot decode, for
/// instance) is logged and skipped. Returns the number of such errors.
async fn drive_handler<S, E>(events: S) -> usize
where
    S: Stream<Item = Result<(), E>>,
    E: Display,
{
    let mut events = pin!(events);
    let mut errors = 0;

    while let Some(event) = events.next().await {
        if let Err(e) = event {
            errors += 1;
            tracing::debug!("Browser event error: {}", e);
        }
    }

    errors
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let deadline = Instant::now() + timeout;

        loop {
            let visible = self
                .evaluate(ELEMENT_VISIBLE, vec![Value::from(selector)])
                .await?;

            if visible.as_bool() == Some(true) {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    waiting_for: selector.to_string(),
                    timeout,
                });
            }

            tokio::time::sleep(VISIBILITY_POLL_INTERVAL).await;
        }
    }

    async fn evaluate(&self, function: &str, args: Vec<Value>) -> BrowserResult<Value> {
        let arguments: Vec<CallArgument> = args
            .into_iter()
            .map(|value| CallArgument::builder().value(value).build())
            .collect();

        let params = CallFunctionOnParams::builder()
            .function_declaration(function)
            .arguments(arguments)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(BrowserError::Evaluation)?;

        let result = self
            .page
            .evaluate_function(params)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn outer_html(&self) -> BrowserResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Evaluation(format!("failed to read page HTML: {}", e)))
    }
}

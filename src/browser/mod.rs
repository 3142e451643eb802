//! Browser module for driving a headless browser
//!
//! The crawler only needs four capabilities from a browser: navigate to a
//! URL, wait for a selector to become visible, evaluate a function in the
//! page with bound arguments, and read back the rendered markup. They are
//! expressed by the [`BrowserDriver`] trait so the crawl logic can run
//! against Chrome in production and against scripted drivers in tests.

mod chrome;
mod session;

pub use chrome::ChromeDriver;
pub use session::BrowserSession;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the browser layer
///
/// All of them are transient from the crawler's point of view and are
/// retried by policy.
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {timeout:?} waiting for {waiting_for}")]
    Timeout {
        waiting_for: String,
        timeout: Duration,
    },

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// Capability set of a browser automation backend
///
/// Implementations operate on a single page. Calls may be issued from
/// several tasks at once; implementations must be safe to share, but the
/// crawler never navigates concurrently (see [`BrowserSession`]).
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigates the page to `url` and waits for the navigation to commit
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Waits until an element matching `selector` is visible
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Calls the JavaScript function declaration `function` with `args` bound
    /// as its arguments and returns its JSON-serialized result
    async fn evaluate(&self, function: &str, args: Vec<Value>) -> BrowserResult<Value>;

    /// Returns the outer HTML of the document element
    async fn outer_html(&self) -> BrowserResult<String>;
}

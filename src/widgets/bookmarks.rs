//! Bookmarks: per-page link list, favicon lookup and title auto-fetch

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::document::Page;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?domain=";

/// A saved link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub title: String,
    pub url: String,
}

impl Bookmark {
    /// Title, or the URL when the title is blank
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("bookmark URL is empty")]
    EmptyUrl,
    #[error("no bookmark at index {0}")]
    NotFound(usize),
}

impl Page {
    /// Append a bookmark and return its index
    pub fn add_bookmark(&mut self, url: &str, title: &str) -> Result<usize, BookmarkError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(BookmarkError::EmptyUrl);
        }
        self.bookmarks.push(Bookmark {
            title: title.trim().to_string(),
            url: url.to_string(),
        });
        Ok(self.bookmarks.len() - 1)
    }

    /// Set a bookmark's title; a blank title falls back to showing the URL
    pub fn rename_bookmark(&mut self, index: usize, title: &str) -> Result<(), BookmarkError> {
        let bookmark = self
            .bookmarks
            .get_mut(index)
            .ok_or(BookmarkError::NotFound(index))?;
        bookmark.title = title.trim().to_string();
        Ok(())
    }

    pub fn delete_bookmark(&mut self, index: usize) -> Result<Bookmark, BookmarkError> {
        if index >= self.bookmarks.len() {
            return Err(BookmarkError::NotFound(index));
        }
        Ok(self.bookmarks.remove(index))
    }

    /// Give untitled bookmarks for `url` a fetched title; returns how many changed
    pub fn fill_missing_title(&mut self, url: &str, title: &str) -> usize {
        let title = title.trim();
        if title.is_empty() {
            return 0;
        }
        let mut filled = 0;
        for bookmark in self
            .bookmarks
            .iter_mut()
            .filter(|b| b.url == url && b.title.trim().is_empty())
        {
            bookmark.title = title.to_string();
            filled += 1;
        }
        filled
    }
}

/// Icon service URL for the bookmark's domain
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url)
        .or_else(|_| url::Url::parse(&format!("https://{}", url.trim())))
        .ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}{}", FAVICON_SERVICE, host))
}

/// Only absolute http(s) URLs are worth fetching a title for
pub fn is_fetchable(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

fn title_regex() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern"))
}

/// Pull the document title out of an HTML page
pub fn extract_title(html: &str) -> Option<String> {
    let captured = title_regex().captures(html)?.get(1)?.as_str();
    let title = decode_entities(captured.split_whitespace().collect::<Vec<_>>().join(" ").as_str());
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Outcome of a title lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFetch {
    pub url: String,
    pub title: String,
    /// False when the URL had to stand in for the title
    pub found: bool,
}

impl TitleFetch {
    fn fallback(url: String) -> Self {
        Self {
            title: url.clone(),
            url,
            found: false,
        }
    }
}

/// Best-effort page title lookups on a worker thread
///
/// Each request is a single GET with a timeout; results are drained by the UI
/// thread with [`TitleFetcher::poll`].
pub struct TitleFetcher {
    tx: Sender<TitleFetch>,
    rx: Receiver<TitleFetch>,
}

impl Default for TitleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleFetcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Start a lookup; non-http URLs resolve to themselves immediately
    pub fn request(&self, url: &str) {
        let url = url.trim().to_string();
        if !is_fetchable(&url) {
            let _ = self.tx.send(TitleFetch::fallback(url));
            return;
        }

        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let outcome = match fetch_title(&url) {
                Ok(Some(title)) => TitleFetch {
                    url,
                    title,
                    found: true,
                },
                Ok(None) => {
                    tracing::debug!("No <title> at {}", url);
                    TitleFetch::fallback(url)
                }
                Err(e) => {
                    tracing::debug!("Title fetch failed for {}: {:#}", url, e);
                    TitleFetch::fallback(url)
                }
            };
            let _ = tx.send(outcome);
        });
    }

    /// Finished lookups since the last call
    pub fn poll(&self) -> Vec<TitleFetch> {
        self.rx.try_iter().collect()
    }
}

fn fetch_title(url: &str) -> Result<Option<String>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let body = client
        .get(url)
        .send()
        .with_context(|| format!("Request to {} failed", url))?
        .text()
        .context("Response body was not text")?;
    Ok(extract_title(&body))
}

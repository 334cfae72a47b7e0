//! Diagnostic side channel returned alongside scrape results.
//!
//! Every event is also emitted through `tracing` at the matching level, so
//! the log and the returned record never disagree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCode {
    ScanStarted,
    PageFetched,
    FetchFailed,
    EmptyFirstPage,
    PaginationExhausted,
    PaginationUnavailable,
    ScanFinished,
}

impl EventCode {
    #[must_use]
    pub fn level(self) -> EventLevel {
        match self {
            EventCode::ScanStarted
            | EventCode::PageFetched
            | EventCode::PaginationExhausted
            | EventCode::ScanFinished => EventLevel::Info,
            EventCode::EmptyFirstPage | EventCode::PaginationUnavailable => EventLevel::Warning,
            EventCode::FetchFailed => EventLevel::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeEvent {
    pub level: EventLevel,
    pub code: EventCode,
    pub store: String,
    pub page: Option<u32>,
    pub url: Option<String>,
    pub message: String,
}

/// Collects events for one store.
#[derive(Debug)]
pub(crate) struct EventLog {
    store: String,
    events: Vec<ScrapeEvent>,
}

impl EventLog {
    pub(crate) fn new(store: &str) -> Self {
        Self {
            store: store.to_owned(),
            events: Vec::new(),
        }
    }

    pub(crate) fn record(
        &mut self,
        code: EventCode,
        page: Option<u32>,
        url: Option<&str>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        let level = code.level();
        let store = self.store.as_str();
        match level {
            EventLevel::Info => tracing::info!(store, ?code, page, url, "{message}"),
            EventLevel::Warning => tracing::warn!(store, ?code, page, url, "{message}"),
            EventLevel::Error => tracing::error!(store, ?code, page, url, "{message}"),
        }
        self.events.push(ScrapeEvent {
            level,
            code,
            store: self.store.clone(),
            page,
            url: url.map(str::to_owned),
            message,
        });
    }

    pub(crate) fn into_events(self) -> Vec<ScrapeEvent> {
        self.events
    }
}

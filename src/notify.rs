// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Notifications
//!
//! Short, user-facing notices emitted by the workflows: the terminal
//! equivalent of toast messages. A notice is informational only; the
//! workflow's return value is what callers act on.
//!
//! Every notice is also written to the log at the matching level.

use std::sync::Mutex;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Info,
    /// Partial success, e.g. the backend write succeeded but the chain write did not.
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, title: &str, description: Option<&str>) {
        self.notify(build(NoticeLevel::Success, title, description));
    }

    fn info(&self, title: &str, description: Option<&str>) {
        self.notify(build(NoticeLevel::Info, title, description));
    }

    fn warning(&self, title: &str, description: Option<&str>) {
        self.notify(build(NoticeLevel::Warning, title, description));
    }

    fn error(&self, title: &str, description: Option<&str>) {
        self.notify(build(NoticeLevel::Error, title, description));
    }
}

fn build(level: NoticeLevel, title: &str, description: Option<&str>) -> Notice {
    let notice = Notice::new(level, title);
    match description {
        Some(d) => notice.with_description(d),
        None => notice,
    }
}

fn log_notice(notice: &Notice) {
    let description = notice.description.as_deref().unwrap_or_default();
    match notice.level {
        NoticeLevel::Success | NoticeLevel::Info => {
            tracing::info!(kind = notice.level.as_str(), description, "{}", notice.title)
        }
        NoticeLevel::Warning => tracing::warn!(description, "{}", notice.title),
        NoticeLevel::Error => tracing::error!(description, "{}", notice.title),
    }
}

/// Prints notices to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        log_notice(&notice);
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        match &notice.description {
            Some(description) => eprintln!("[{tag}] {}: {description}", notice.title),
            None => eprintln!("[{tag}] {}", notice.title),
        }
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every notice so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded notices.
    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        log_notice(&notice);
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

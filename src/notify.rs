use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Receives notices; never answers back.
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

impl NoticeSink for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// On-screen toast stack with per-notice expiry.
///
/// Expiry runs on the caller's clock: a notice is stamped with the instant of
/// the most recent `prune`, so call it before producing the frame's notices.
pub struct Toasts {
    ttl: Duration,
    cap: usize,
    now: Instant,
    items: VecDeque<(Notice, Instant)>,
}

impl Toasts {
    pub fn new(ttl: Duration, cap: usize, now: Instant) -> Self {
        Self {
            ttl,
            cap: cap.max(1),
            now,
            items: VecDeque::new(),
        }
    }

    pub fn prune(&mut self, now: Instant) {
        self.now = self.now.max(now);
        let now = self.now;
        self.items.retain(|(_, until)| *until > now);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Newest last.
    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().map(|(n, _)| n)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl NoticeSink for Toasts {
    fn notify(&mut self, notice: Notice) {
        // game over stays up longer
        let ttl = match notice.severity {
            Severity::Info => self.ttl,
            Severity::Destructive => self.ttl * 3,
        };
        self.items.push_back((notice, self.now + ttl));
        while self.items.len() > self.cap {
            self.items.pop_front();
        }
    }
}

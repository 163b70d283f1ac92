//! Bookkeeping for flag image downloads, independent of the widget toolkit.
//!
//! Each URL is fetched at most once per session. Widgets that ask for a URL
//! while its download is running wait on it, and a URL that failed is not
//! tried again. A waiter that is retargeted to another URL stops waiting on
//! the old one, so a late download never lands on a widget that has moved on.

use std::collections::{HashMap, HashSet};

/// What the caller should do after [`FlagLoads::request`].
#[derive(Debug, PartialEq)]
pub enum FlagRequest<T> {
    /// Already downloaded: show it now.
    Ready(T),
    /// First request for this URL: start the download, then call [`FlagLoads::finish`].
    Start,
    /// A download is already running; the waiter is handed back from `finish`.
    Waiting,
    /// Nothing to show: no URL, or an earlier attempt failed.
    Unavailable,
}

#[derive(Debug)]
pub struct FlagLoads<T, W> {
    ready: HashMap<String, T>,
    pending: HashMap<String, Vec<W>>,
    failed: HashSet<String>,
}

impl<T, W> Default for FlagLoads<T, W> {
    fn default() -> Self {
        Self {
            ready: HashMap::new(),
            pending: HashMap::new(),
            failed: HashSet::new(),
        }
    }
}

impl<T: Clone, W: PartialEq> FlagLoads<T, W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `waiter` at `url`, dropping whatever it was waiting for before.
    pub fn request(&mut self, url: &str, waiter: W) -> FlagRequest<T> {
        self.forget(&waiter);

        if url.is_empty() || self.failed.contains(url) {
            return FlagRequest::Unavailable;
        }
        if let Some(texture) = self.ready.get(url) {
            return FlagRequest::Ready(texture.clone());
        }
        match self.pending.get_mut(url) {
            Some(waiters) => {
                waiters.push(waiter);
                FlagRequest::Waiting
            }
            None => {
                self.pending.insert(url.to_string(), vec![waiter]);
                FlagRequest::Start
            }
        }
    }

    /// Records the outcome of a download and returns the waiters still
    /// pointed at `url`. `None` marks the URL as failed.
    pub fn finish(&mut self, url: &str, outcome: Option<T>) -> Vec<W> {
        match outcome {
            Some(texture) => {
                self.ready.insert(url.to_string(), texture);
            }
            None => {
                self.failed.insert(url.to_string());
            }
        }
        self.pending.remove(url).unwrap_or_default()
    }

    /// Stops `waiter` from receiving any pending download.
    pub fn forget(&mut self, waiter: &W) {
        for waiters in self.pending.values_mut() {
            waiters.retain(|w| w != waiter);
        }
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains_key(url)
    }

    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }
}

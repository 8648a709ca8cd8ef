// src/crawl/state.rs
// =============================================================================
// The two pieces of mutable state shared by every crawl task.
//
// - VisitedSet: canonical URLs that some task has claimed. Claiming is a
//   single test-and-set under one lock, so when several pages link to the
//   same URL at the same time exactly one task wins and fetches it.
// - ResultCollection: pages in the order their fetches completed.
//
// Both use std::sync::Mutex. The locks are only held for a HashSet insert
// or a Vec push and never across an .await, so a blocking mutex is fine
// inside async code.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::page::Page;

// A panic in another task cannot leave a HashSet or Vec half-updated by the
// operations below, so a poisoned lock is still safe to use
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Canonical URLs already claimed by a crawl task
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key` for the caller.
    ///
    /// Returns true for exactly one caller per key; every later (or
    /// concurrent) caller gets false.
    pub fn insert_if_absent(&self, key: &str) -> bool {
        let mut urls = lock(&self.urls);
        if urls.contains(key) {
            return false;
        }
        urls.insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.urls).contains(key)
    }

    pub fn len(&self) -> usize {
        lock(&self.urls).len()
    }
}

/// Append-only list of crawled pages
#[derive(Debug, Default)]
pub struct ResultCollection {
    pages: Mutex<Vec<Page>>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, page: Page) {
        lock(&self.pages).push(page);
    }

    /// Takes the pages out, leaving the collection empty
    pub fn take(&self) -> Vec<Page> {
        std::mem::take(&mut *lock(&self.pages))
    }
}

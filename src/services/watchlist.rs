use crate::models::Title;
use std::sync::{PoisonError, RwLock};

/// Session watchlist: an ordered set of titles keyed by id
///
/// Operations are synchronous and never touch the network. Implementations
/// are injected wherever the watchlist is needed so a persistent backend can
/// replace the in-memory one without changing call sites.
pub trait WatchlistStore: Send + Sync {
    fn is_member(&self, id: &str) -> bool;

    /// Appends the title unless its id is already present; returns whether it was added
    fn add(&self, title: Title) -> bool;

    /// Removes the title with this id; returns whether anything was removed
    fn remove(&self, id: &str) -> bool;

    /// Current entries in insertion order
    fn entries(&self) -> Vec<Title>;

    fn len(&self) -> usize;
}

/// Watchlist that lives as long as the process
#[derive(Debug, Default)]
pub struct InMemoryWatchlist {
    titles: RwLock<Vec<Title>>,
}

impl InMemoryWatchlist {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WatchlistStore for InMemoryWatchlist {
    fn is_member(&self, id: &str) -> bool {
        let titles = self.titles.read().unwrap_or_else(PoisonError::into_inner);
        titles.iter().any(|t| t.id == id)
    }

    fn add(&self, title: Title) -> bool {
        let mut titles = self.titles.write().unwrap_or_else(PoisonError::into_inner);
        if titles.iter().any(|t| t.id == title.id) {
            return false;
        }

        tracing::debug!(title_id = %title.id, title = %title.title, "Added to watchlist");
        titles.push(title);
        true
    }

    fn remove(&self, id: &str) -> bool {
        let mut titles = self.titles.write().unwrap_or_else(PoisonError::into_inner);
        let before = titles.len();
        titles.retain(|t| t.id != id);

        let removed = titles.len() != before;
        if removed {
            tracing::debug!(title_id = %id, "Removed from watchlist");
        }
        removed
    }

    fn entries(&self) -> Vec<Title> {
        self.titles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn len(&self) -> usize {
        self.titles.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

pub mod availability;
pub mod content;
pub mod matching;
pub mod providers;
pub mod watchlist;

pub use availability::{AvailabilityResolver, DetailLookup, ResolveStep};
pub use content::ContentResolver;
pub use matching::{FirstMatch, MatchStrategy};
pub use watchlist::{InMemoryWatchlist, WatchlistStore};

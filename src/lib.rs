//! Movie and TV lookup backend.
//!
//! Resolves a free-text query to titles through a metadata provider (TMDB),
//! finds where a title can be streamed, rented or bought through an
//! availability provider (Watchmode), and keeps a session watchlist.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;

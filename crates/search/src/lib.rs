// crates/search/src/lib.rs
//! Incremental task search for the viewer.
//!
//! - **Store**: [`TaskRecordStore`], the records of one load cycle
//! - **Engine**: [`run_search`] over id/title/status, plus content in full-text mode
//! - **Highlight**: escaping and `<mark>` wrapping that cannot inject markup
//! - **History**: the last five submitted queries, persisted via [`HistoryStore`]
//! - **Debounce**: 300 ms input coalescing

pub mod debounce;
pub mod engine;
pub mod highlight;
pub mod history;
pub mod store;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use engine::{matches, normalize_query, run_search, CardView, SearchOutcome};
pub use highlight::{escape_html, highlight};
pub use history::{
    load_history, FileHistoryStore, HistoryError, HistoryStore, MemoryHistoryStore, SearchHistory,
};
pub use store::TaskRecordStore;

// * Persistence
// * Pretty-printed UTF-8 JSON files for collected articles and extracted startups

pub mod store;

// * Re-exports for convenient access
pub use store::{
    load_source_records, load_startups, safe_topic, save_results, save_source_records,
    save_startups, PersistenceError,
};

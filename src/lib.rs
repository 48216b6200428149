pub mod analyzer;
pub mod config;
pub mod db;
pub mod environment;
pub mod identity;
pub mod logging;
pub mod reconcile;
pub mod signature;
pub mod store;
pub mod text_source;

pub const TARGET_DB: &str = "db_query";

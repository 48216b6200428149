// Re-export the Database struct and other public items
pub mod core;
mod issue;
mod observation;
mod person;
pub mod query;
mod schema;
mod signature;
mod store;

// Re-export Database and the query types callers build filters with
pub use self::core::Database;
pub use self::query::{Conditions, IssueColumn, ObservationColumn, Operator, Separator, Value};

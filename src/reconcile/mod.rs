//! Post-processing of raw signature observations: picking a single role per person
//! and recovering the ministry a role refers to.

pub mod ministry;
pub mod roles;

pub use ministry::{MinistryResolver, MinistryTitle};
pub use roles::{PersonReconciliation, ReconciliationReport, RoleReconciler, UpdateScope};

pub const TARGET_RECONCILE: &str = "reconcile";

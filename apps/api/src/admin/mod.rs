//! Admin dashboard: application and job totals across the whole system.

pub mod handlers;
pub mod stats;

//! Bot progression for technical applications.
//!
//! `rules` decides a single step, `batch` applies it across pending applications, `store`
//! persists each step atomically.

pub mod batch;
pub mod handlers;
pub mod rules;
pub mod seed;
pub mod stats;
pub mod store;

//! Applications: creation with one-time scoring, reads filtered by viewer role, manual status
//! changes for non-technical roles, and comments.

pub mod access;
pub mod handlers;
pub mod ingest;
pub mod repository;
pub mod resume_text;

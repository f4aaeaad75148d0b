//! Job postings. Applications snapshot a posting's title and technical flag at creation and
//! score against its description and required skills.

pub mod handlers;
pub mod repository;

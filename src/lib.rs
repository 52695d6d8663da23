//! Scoring and comparison of candidate building sites against a criterion
//! catalog.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod geocode;
pub mod registry;
pub mod report;
pub mod scoring;
pub mod search;
pub mod types;

//! # iprep Common Library
//!
//! Core of the interview-prep tracker, shared by all front ends:
//! - Problem record model and derived fields
//! - CSV ingestion: parsing, validation, normalization
//! - In-memory problem store with bulk upsert reconciliation
//! - Query engine and summary analytics
//! - CSV export
//! - Configuration loading

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod query;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use model::{CandidateRecord, Difficulty, NewProblem, ProblemPatch, ProblemRecord, Status};
pub use store::{ImportResult, ProblemStore};

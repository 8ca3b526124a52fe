//! HTTP API handlers for iprep-server

pub mod analytics;
pub mod auth;
pub mod buildinfo;
pub mod csv;
pub mod export;
pub mod health;
pub mod problems;

pub use analytics::{get_difficulty_distribution, get_stats, get_tag_distribution};
pub use auth::check_edit_key;
pub use buildinfo::get_build_info;
pub use csv::{import_rows, parse_csv_text, validate_csv_rows, validation_report};
pub use export::export_problems;
pub use health::health_routes;
pub use problems::{create_problem, delete_problem, get_problem, list_problems, update_problem};

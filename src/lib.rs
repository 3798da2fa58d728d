// src/lib.rs

pub mod config; // dla src/config.rs
pub mod errors; // dla src/errors.rs
pub mod extractor; // dla src/extractor.rs
pub mod filters; // dla src/filters.rs
pub mod handlers; // dla src/handlers.rs
pub mod impact; // dla src/impact.rs
pub mod models; // dla src/models.rs
pub mod pagination; // dla src/pagination.rs
pub mod services; // dla src/services.rs
pub mod state; // dla src/state.rs

//! # HTTP Server Module
//!
//! Axum server exposing the table.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /categories` - Distinct category values
//! - `GET /data/{category}` - Rows in a category
//! - `GET /rows/{id}` - One row by id
//! - `POST /update` - Overwrite description and price of a row
//! - `POST /delete` - Remove a row

pub mod config;
pub mod observability_routes;
pub mod server;
pub mod table_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use table_routes::{TableState, DELETED_MESSAGE, UPDATED_MESSAGE};

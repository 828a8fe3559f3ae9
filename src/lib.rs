//! sheetbase - serve, filter, edit and persist a spreadsheet table over HTTP
//!
//! A single table is loaded from a spreadsheet at startup and held in
//! memory. Reads filter it by category; updates and deletes change it in
//! place and rewrite the whole table to an output file.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod table;

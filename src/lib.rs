//! tourneydb - flat-file CRUD service for tournament teams, matches and reports
//!
//! Records live in one delimited-text table per entity type; deleted records
//! move to an append-only archive table.

pub mod cli;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod schema;
pub mod storage;
pub mod store;

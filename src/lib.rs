//! show-table - serve one SQL report from a CMS database as an HTML table.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod report;
pub mod safety;
pub mod server;
pub mod service;
pub mod site;

//! Integration tests for show-table.

pub mod connection_test;
pub mod report_test;
pub mod server_test;
pub mod sqlite_test;

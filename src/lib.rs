// The binary in main.rs drives the terminal; everything it uses lives here so
// integration tests can reach the sessions, the cache and the remote adapter.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod model;
pub mod remote;
pub mod session;
pub mod store;
pub mod ui;

// Crate root library declaration and module exports.
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod controller;
pub mod format;
pub mod intent;
pub mod model;
pub mod provider;
pub mod session;
pub mod storage;
pub mod store;

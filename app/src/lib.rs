//! BW Diet application library
//!
//! The outer layer around `bw_diet_shared`: configuration, the JSON
//! snapshot file store, services and the command line front end.

pub mod cli;
pub mod config;
pub mod error;
pub mod services;
pub mod store;

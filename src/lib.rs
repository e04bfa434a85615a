#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod error;
pub mod export;
pub mod formats;
pub mod logging;
pub mod render;
pub mod routes;
pub mod server;

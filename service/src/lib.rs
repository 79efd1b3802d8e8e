#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod camara;
pub mod config;
pub mod explain;
pub mod http;
pub mod listing;
pub mod proxy;
pub mod rest;

mod config;
mod logging;
mod rpc_middleware;
mod shutdown;

pub mod netutils;
pub mod service;

pub use logging::*;
pub use rpc_middleware::*;
pub use shutdown::*;

pub use crate::config::*;

//! Unary Connect protocol runtime used by the generated service stubs.
//!
//! Clients speak Connect over any [`HttpClient`] (reqwest by default) and
//! handlers are mounted on axum routers.

mod client;
mod code;
mod codec;
mod compression;
mod error;
mod handler;
mod request;

pub mod protocol;

pub use async_trait::async_trait;
pub use axum;
pub use client::*;
pub use code::*;
pub use codec::*;
pub use compression::*;
pub use error::*;
pub use handler::*;
pub use request::*;

/// Items referenced by generated `*_connect` modules.
#[doc(hidden)]
pub mod codegen {
    pub use std::sync::Arc;

    pub use async_trait::async_trait;
    pub use axum::Router;

    pub use crate::{
        unary_handler,
        ClientOptions,
        Code,
        ConnectError,
        HandlerOptions,
        HttpClient,
        Request,
        Response,
        UnaryClient,
    };
}

// Generated stubs hold clients and options across tasks. Compiler will fail
// if any of them stops being Send + Sync.
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<ConnectError>;
    let _ = assert_send_sync::<ClientOptions>;
    let _ = assert_send_sync::<HandlerOptions>;
    let _ = assert_send_sync::<UnaryClient<(), ()>>;
};

// src/serve/mod.rs

//! The reload server.
//!
//! A minimal HTTP server over the build output directory. It exists for
//! one reason: browsers pointed at the output need to notice rebuilds, so
//! every response disables caching and `GET /.build_timestamp` exposes the
//! last successful build time for a client-side poller.

pub mod server;

pub use server::{BUILD_TIMESTAMP_ROUTE, ServeState, bind, router, serve};

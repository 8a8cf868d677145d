//! HTTP middleware: session management and authentication gates.

pub mod auth;
pub mod session;

//! Integration tests
//!
//! `router_tests` drive the full router in-process over in-memory stores.
//! `api_tests` target a running server and are ignored by default.

mod api_tests;
mod router_tests;
mod support;

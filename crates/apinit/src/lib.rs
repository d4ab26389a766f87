//! Generates the `__init__.py` files that assemble a Python library's public
//! API from export annotations.
//!
//! The pipeline is scan ([`scanner`]) -> aggregate ([`init_builder`]) ->
//! write ([`writer`]), driven by an export manifest ([`universe`]) and a
//! small [`config`] layer.

pub mod config;
pub mod error;
pub mod init_builder;
pub mod scanner;
pub mod types;
pub mod universe;
pub mod writer;

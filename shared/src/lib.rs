//! Shared domain types for the roster service
//!
//! Entity models and payload DTOs used by both the server and any
//! in-process clients. Database derives (`sqlx::FromRow`/`sqlx::Type`)
//! are gated behind the `db` feature so UI consumers stay slim.

pub mod models;
pub mod util;

//! Core data model definitions shared across Keystone crates.
#![allow(missing_docs)]

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod prelude;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use auth::{AuthResponse, LoginRequest, LogoutRequest, RegisterRequest};
pub use dashboard::{ActivityKind, ActivityUser, DashboardStats, RecentActivity};
pub use error::{ModelError, Result as ModelResult};
pub use user::{Role, User, UserId};

//! Client/UI focused snapshot of the types surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in keystone-client or other presentation layers.

pub use super::auth::{
    AuthResponse, LoginRequest, LogoutRequest, RegisterRequest,
};
pub use super::dashboard::{
    ActivityKind, ActivityUser, DashboardStats, RecentActivity,
};
pub use super::error::{ModelError, Result as ModelResult};
pub use super::user::{Role, User, UserId};

//! Dashboard data
//!
//! Until the server exposes dashboard endpoints the default source serves
//! fixed sample data after an artificial delay, so loading states in the UI
//! can be exercised.

pub mod service;

pub use service::{
    ACTIVITY_ENDPOINT, DashboardService, DashboardSource, STATS_ENDPOINT,
};

//! Test doubles and fixtures shared by unit and integration tests

pub mod fixtures;
pub mod stubs;

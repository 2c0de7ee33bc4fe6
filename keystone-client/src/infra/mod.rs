pub mod api_client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod storage;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

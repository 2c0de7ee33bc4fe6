//! Application root wiring
//!
//! Every shared object is constructed here once and handed out explicitly;
//! nothing in the crate reaches for a global.

pub mod bootstrap;

pub use bootstrap::AppContext;

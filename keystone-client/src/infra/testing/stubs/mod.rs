pub mod navigation;
pub mod session;

pub use navigation::RecordingNavigator;
pub use session::{StubCall, StubSessionApi};

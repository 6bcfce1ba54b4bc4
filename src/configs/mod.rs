pub mod base;
pub mod delay;
pub mod logging;
pub mod session;

pub use base::*;
pub use delay::*;
pub use logging::*;
pub use session::*;

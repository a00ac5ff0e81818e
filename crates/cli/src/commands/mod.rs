//! Command implementations.

mod info;
mod play;
mod scrub;
mod validate;

pub use info::run_info;
pub use play::run_play;
pub use scrub::run_scrub;
pub use validate::run_validate;

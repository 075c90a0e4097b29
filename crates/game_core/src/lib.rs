mod controller;
pub mod placement;
mod session;
pub mod timing;
mod token;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use controller::{ClickOutcome, GameController};
pub use session::{GameSession, StartDisposition};
pub use timing::RoundTiming;
pub use token::Token;

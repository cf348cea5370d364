#![forbid(unsafe_code)]

pub mod model;
pub mod parser;
pub mod session;
pub mod time;

pub use parser::{ParseOutcome, ParseTier, parse_completion};
pub use session::{AnswerCheck, PracticeSession, SessionError, SessionProgress};
pub use time::Clock;

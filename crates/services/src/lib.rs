#![forbid(unsafe_code)]

pub mod admin;
pub mod completion;
pub mod error;
pub mod notice;
pub mod practice;
pub mod source;

pub use sat_core::Clock;

pub use admin::{AdminConsole, AdminGrant};
pub use completion::{ChatCompletionClient, CompletionClient, CompletionConfig};
pub use error::{AdminError, CompletionError, PracticeError, QuestionSourceError};
pub use notice::{Notice, NoticeKind};
pub use practice::{Applied, PracticeController, RequestTicket};
pub use source::{PromptedQuestionSource, QuestionApiSource, QuestionSource};

mod category;
mod ids;
mod prompt;
mod question;
mod response;
mod user;

pub use category::{CategoryError, CategoryFamily, QuestionCategory};
pub use ids::{ParseIdError, PromptId, UserId};
pub use prompt::{Prompt, PromptError};
pub use question::{
    AnswerLetter, Choice, CorrectAnswer, ParsedQuestion, QuestionItem, RawCompletion,
};
pub use response::ResponseLogEntry;
pub use user::CurrentUser;

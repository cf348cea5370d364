use clap::{Parser, Subcommand, ValueEnum};
use sat_core::model::{CurrentUser, PromptId, QuestionCategory, UserId};
use services::completion::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use services::source::DEFAULT_QUESTION_API_URL;

#[derive(Parser, Debug)]
#[command(name = "sat", version, about = "SAT practice from the terminal")]
pub struct Cli {
    /// SQLite URL for prompts, admins and the response log.
    #[arg(long = "db", env = "SAT_DB_URL", default_value = "sqlite:sat.sqlite3?mode=rwc")]
    pub db_url: String,

    /// Signed-in user id, as issued by the auth provider.
    #[arg(long, env = "SAT_USER_ID")]
    pub user: Option<UserId>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    #[must_use]
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser::from(self.user)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer questions for one category.
    Practice(PracticeArgs),
    /// Manage generation prompts (admins only).
    #[command(subcommand)]
    Prompts(PromptsCommand),
    /// Admin allow-list.
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(clap::Args, Debug)]
pub struct PracticeArgs {
    /// One of: reading_passage, reading_questions, writing_passage,
    /// writing_questions, math_with_calculator, math_no_calculator.
    #[arg(long, short)]
    pub category: QuestionCategory,

    #[arg(long, value_enum, default_value_t = SourceKind::Api)]
    pub source: SourceKind,

    #[arg(long, env = "SAT_QUESTION_API_URL", default_value = DEFAULT_QUESTION_API_URL)]
    pub api_url: String,

    #[arg(long, env = "SAT_AI_API_KEY", hide_env_values = true)]
    pub ai_key: Option<String>,

    #[arg(long, env = "SAT_AI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub ai_base_url: String,

    #[arg(long, env = "SAT_AI_MODEL", default_value = DEFAULT_MODEL)]
    pub ai_model: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Pre-generated questions from the hosted question API.
    Api,
    /// Stored prompts sent to the language model.
    Prompts,
}

#[derive(Subcommand, Debug)]
pub enum PromptsCommand {
    /// Print every prompt, ordered by category.
    List,
    /// Replace a prompt's content.
    Edit {
        id: PromptId,
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        /// Read the new content from a file.
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Add the signed-in user to the allow-list.
    Enroll,
}

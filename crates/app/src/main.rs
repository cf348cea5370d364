use std::sync::Arc;

use clap::Parser;
use services::{
    AdminConsole, ChatCompletionClient, Clock, CompletionClient, CompletionConfig, Notice,
    PracticeController, PromptedQuestionSource, QuestionApiSource, QuestionSource,
};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

mod cli;
mod terminal;

use cli::{AdminCommand, Cli, Command, PracticeArgs, PromptsCommand, SourceKind};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,services=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn question_source(
    args: &PracticeArgs,
    storage: &Storage,
) -> Result<Arc<dyn QuestionSource>, Box<dyn std::error::Error>> {
    match args.source {
        SourceKind::Api => Ok(Arc::new(QuestionApiSource::new(&args.api_url)?)),
        SourceKind::Prompts => {
            let config = args
                .ai_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .map(|key| CompletionConfig {
                    base_url: args.ai_base_url.clone(),
                    api_key: key.to_string(),
                    model: args.ai_model.clone(),
                });
            let client = ChatCompletionClient::new(config);
            if !client.enabled() {
                tracing::warn!("SAT_AI_API_KEY is not set; prompted generation will fail");
            }
            let client: Arc<dyn CompletionClient> = Arc::new(client);
            Ok(Arc::new(PromptedQuestionSource::new(
                Arc::clone(&storage.prompts),
                client,
            )))
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    // Open + migrate SQLite in the binary glue so core/services stay storage-agnostic.
    let storage = Storage::sqlite(&cli.db_url).await?;
    let clock = Clock::system();
    let user = cli.current_user();

    match &cli.command {
        Command::Practice(args) => {
            let source = question_source(args, &storage)?;
            let mut controller =
                PracticeController::new(clock, source, Arc::clone(&storage.responses))
                    .with_user(user);
            terminal::run(&mut controller, args.category).await?;
        }
        Command::Prompts(command) => {
            let console = AdminConsole::new(
                clock,
                Arc::clone(&storage.prompts),
                Arc::clone(&storage.admins),
            );
            let grant = match console.authorize(user).await {
                Ok(grant) => grant,
                Err(err) => {
                    println!("{}", Notice::for_admin_error(&err));
                    return Err(err.into());
                }
            };
            match command {
                PromptsCommand::List => {
                    let prompts = match console.list_prompts(&grant).await {
                        Ok(prompts) => prompts,
                        Err(err) => {
                            println!("{}", Notice::prompts_unavailable());
                            return Err(err.into());
                        }
                    };
                    for prompt in prompts {
                        let marker = if prompt.is_default() { " (default)" } else { "" };
                        println!(
                            "== {} [{}]{marker} updated {}",
                            prompt.category(),
                            prompt.id(),
                            prompt.updated_at().to_rfc3339()
                        );
                        println!("{}\n", prompt.content());
                    }
                }
                PromptsCommand::Edit { id, content, file } => {
                    let content = match (content, file) {
                        (Some(content), _) => content.clone(),
                        (None, Some(path)) => std::fs::read_to_string(path)?,
                        (None, None) => return Err("--content or --file is required".into()),
                    };
                    console.edit_prompt(&grant, *id, content).await?;
                    println!("{}", Notice::prompt_saved());
                }
            }
        }
        Command::Admin(AdminCommand::Enroll) => {
            let console = AdminConsole::new(
                clock,
                Arc::clone(&storage.prompts),
                Arc::clone(&storage.admins),
            );
            let grant = console.enroll(user).await?;
            println!("{} can now manage prompts", grant.user());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

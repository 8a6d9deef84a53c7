//! Terminal chat with the WeAi assistant.
//!
//! Reads one message per line from stdin. Lines starting with `/` are
//! commands: `/state`, `/suggest`, `/reset`, `/quit`.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weai_assistant::adapters::ai::OfflineAIProvider;
use weai_assistant::adapters::profile::{InMemoryProfileSource, JsonFileProfileSource};
use weai_assistant::application::{
    AssistantSession, OpenSessionCommand, OpenSessionHandler, SendMessageCommand,
};
use weai_assistant::config::{AppConfig, LogConfig};
use weai_assistant::domain::foundation::UserId;
use weai_assistant::ports::{AIProvider, ProfileSource};

const LOCAL_USER: &str = "local";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.log);

    if config.ai.enabled {
        tracing::warn!("no language model adapter is built in; replies fall back to scenarios");
    }

    let provider = Arc::new(OfflineAIProvider::new());
    match &config.profile_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "reading profile document");
            run(&config, Arc::new(JsonFileProfileSource::single(path)), provider).await
        }
        None => run(&config, Arc::new(InMemoryProfileSource::new()), provider).await,
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run<P, A>(config: &AppConfig, profiles: Arc<P>, provider: Arc<A>) -> Result<(), Box<dyn Error>>
where
    P: ProfileSource,
    A: AIProvider + 'static,
{
    let handler = OpenSessionHandler::new(
        profiles,
        provider,
        config.assistant.engine_settings(),
        config.ai.session_settings(),
    );
    let opened = handler
        .handle(OpenSessionCommand {
            user_id: UserId::new(LOCAL_USER)?,
        })
        .await?;
    println!("{}", opened.greeting);

    chat(&opened.session).await?;
    opened.session.close();
    Ok(())
}

async fn chat<A: AIProvider + 'static>(session: &AssistantSession<A>) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => break,
            "/reset" => {
                session.reset(None).await;
                println!("{}", session.welcome(None).await);
            }
            "/suggest" => println!("{}", session.suggestion().await),
            "/state" => {
                let state = session.current_state().await;
                println!("[{}] {} turns", state.step.label(), state.total_turns);
            }
            message => {
                let reply = session.send_message(SendMessageCommand::new(message)).await?;
                println!("{}", reply.text);
            }
        }
    }
    Ok(())
}

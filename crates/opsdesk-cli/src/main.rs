use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use opsdesk_core::config::DataSourceKind;
use opsdesk_core::conversation::{ConversationFilter, Platform, StatusFilter};
use opsdesk_core::inbox::InboxDataSource;
use opsdesk_core::quick_action::QuickAction;
use opsdesk_infrastructure::{FixtureInboxRepository, HttpInboxRepository, load_config};

mod commands;

#[derive(Parser)]
#[command(name = "opsdesk")]
#[command(about = "Opsdesk - unified client-messaging inbox", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversations
    List {
        /// Status segment: all, new, in_progress, needs_reply, archived
        #[arg(long, default_value = "all")]
        status: String,
        /// Restrict to a platform: telegram, whatsapp, email, facebook, instagram
        #[arg(long)]
        platform: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a conversation with its messages
    Show {
        /// Conversation id
        id: String,
    },
    /// Run a quick action against a conversation
    Action {
        /// Conversation id
        id: String,
        /// Action: create_client, create_order, archive_conversation
        action: String,
    },
    /// Render message markup to an HTML fragment
    Render {
        /// Text to render; reads stdin when omitted
        text: Option<String>,
    },
    /// Interactive tabbed chat
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let source: Arc<dyn InboxDataSource> = match config.data_source {
        DataSourceKind::Fixture => Arc::new(FixtureInboxRepository::with_seed_data()),
        DataSourceKind::Live => Arc::new(HttpInboxRepository::from_config(config.live()?)),
    };

    match cli.command {
        Commands::List {
            status,
            platform,
            search,
        } => {
            let filter = ConversationFilter {
                status: StatusFilter::from_str(&status)?,
                platform: platform.as_deref().map(Platform::from_str).transpose()?,
                search,
            };
            commands::list::run(source.as_ref(), &filter).await?;
        }
        Commands::Show { id } => commands::show::run(source.as_ref(), &id).await?,
        Commands::Action { id, action } => {
            let action = QuickAction::from_str(&action)?;
            commands::action::run(source.as_ref(), &id, action).await?;
        }
        Commands::Render { text } => commands::render::run(text)?,
        Commands::Chat => commands::chat::run(source).await?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

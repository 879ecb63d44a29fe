//! Echo CLI - time capsules and the echo wall from the terminal.

mod app;
mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use echo_config::{init_logging, Config, Paths};
use echo_types::CapsuleStatus;

/// Echo CLI - write to your future self and shout into the echo wall.
#[derive(Parser)]
#[command(name = "echo")]
#[command(about = "Echo client for time capsules and the echo wall")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Base directory for config and session files. Defaults to ~/.echo
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long, env = "ECHO_API_URL", global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email (prompted when omitted)
        email: Option<String>,
    },

    /// Create an account and sign in
    Register {
        /// Account email (prompted when omitted)
        email: Option<String>,
    },

    /// Logout and clear the stored session
    Logout,

    /// Show the stored session
    Status,

    /// Reload the signed-in user from the server
    Whoami,

    /// Exchange the current credential for a fresh one
    Refresh,

    /// Change the account password
    ChangePassword,

    /// Request a password reset email
    ForgotPassword {
        email: String,
    },

    /// Manage time capsules
    Capsules {
        #[command(subcommand)]
        command: CapsuleCommands,
    },

    /// Post to and browse the echo wall
    Echoes {
        #[command(subcommand)]
        command: EchoCommands,
    },
}

#[derive(Subcommand)]
enum CapsuleCommands {
    /// List your capsules
    List {
        /// Filter by status (locked, unlocked, public)
        #[arg(short, long)]
        status: Option<CapsuleStatus>,
    },
    /// List capsules shared publicly
    Public,
    /// Show a capsule
    Show {
        id: String,
    },
    /// Create a capsule
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        /// Date after which the capsule may be opened (e.g. 2030-01-01)
        #[arg(long)]
        unlock_date: Option<String>,
        /// Free-form condition evaluated by the server
        #[arg(long)]
        unlock_condition: Option<String>,
        /// Share to the public feed once unlocked
        #[arg(long)]
        public: bool,
    },
    /// Edit a capsule
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Open a capsule whose unlock date has passed
    Unlock {
        id: String,
    },
    /// Publish an unlocked capsule
    Publish {
        id: String,
    },
    /// Delete a capsule
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum EchoCommands {
    /// Post an echo
    Post {
        content: String,
        /// Emotion tag (see `echo echoes emotions`)
        #[arg(short, long)]
        emotion: Option<String>,
    },
    /// List your echoes
    Mine,
    /// List your matches
    Matches,
    /// Show recent echoes from everyone
    Recent {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List the emotion tags
    Emotions,
    /// Pair two echoes by hand
    Match {
        echo_id: String,
        matched_echo_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths)?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
        config.validate()?;
    }

    init_logging(config.effective_log_level(cli.log_level.as_deref()));

    let app = app::App::build(&config, &paths)?;
    let format = cli.format;

    match cli.command {
        Commands::Login { email } => commands::login(&app, email, &format).await,
        Commands::Register { email } => commands::register(&app, email, &format).await,
        Commands::Logout => commands::logout(&app, &format).await,
        Commands::Status => commands::status(&app, &format),
        Commands::Whoami => commands::whoami(&app, &format).await,
        Commands::Refresh => commands::refresh(&app, &format).await,
        Commands::ChangePassword => commands::change_password(&app, &format).await,
        Commands::ForgotPassword { email } => {
            commands::forgot_password(&app, &email, &format).await
        }
        Commands::Capsules { command } => match command {
            CapsuleCommands::List { status } => {
                commands::capsules_list(&app, status, &format).await
            }
            CapsuleCommands::Public => commands::capsules_public(&app, &format).await,
            CapsuleCommands::Show { id } => commands::capsules_show(&app, &id, &format).await,
            CapsuleCommands::Create {
                title,
                content,
                unlock_date,
                unlock_condition,
                public,
            } => {
                commands::capsules_create(
                    &app,
                    commands::NewCapsule {
                        title,
                        content,
                        unlock_date,
                        unlock_condition,
                        public,
                    },
                    &format,
                )
                .await
            }
            CapsuleCommands::Update { id, title, content } => {
                commands::capsules_update(&app, &id, title, content, &format).await
            }
            CapsuleCommands::Unlock { id } => commands::capsules_unlock(&app, &id, &format).await,
            CapsuleCommands::Publish { id } => {
                commands::capsules_publish(&app, &id, &format).await
            }
            CapsuleCommands::Delete { id } => commands::capsules_delete(&app, &id, &format).await,
        },
        Commands::Echoes { command } => match command {
            EchoCommands::Post { content, emotion } => {
                commands::echoes_post(&app, &content, emotion.as_deref(), &format).await
            }
            EchoCommands::Mine => commands::echoes_mine(&app, &format).await,
            EchoCommands::Matches => commands::echoes_matches(&app, &format).await,
            EchoCommands::Recent { limit } => commands::echoes_recent(&app, limit, &format).await,
            EchoCommands::Emotions => commands::echoes_emotions(&app, &format).await,
            EchoCommands::Match {
                echo_id,
                matched_echo_id,
            } => commands::echoes_match(&app, &echo_id, &matched_echo_id, &format).await,
        },
    }
}

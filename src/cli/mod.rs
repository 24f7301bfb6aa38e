use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;
pub mod token;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3000")]
        port: String,
    },
    /// Start a chat session against a running server
    Chat {
        /// Base URL of the server
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,

        /// Session token to authenticate with
        #[arg(long, env = "NIETU_SESSION_TOKEN")]
        token: Option<String>,

        /// Number of lines of the conversation to show
        #[arg(long, default_value = "30")]
        height: usize,

        /// Display name of the assistant
        #[arg(long, env = "NIETU_ASSISTANT_NAME", default_value = "Nietu AI")]
        assistant_name: String,
    },
    /// Sign a session token for local development
    Token {
        /// Subject (the identity provider's user ID)
        #[arg(long)]
        sub: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// How long the session is valid for
        #[arg(long, default_value = "3600")]
        ttl_secs: i64,

        /// Secret the server verifies session tokens with
        #[arg(long, env = "NIETU_SESSION_SECRET", hide_env_values = true)]
        secret: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Chat {
            url,
            token,
            height,
            assistant_name,
        }) => {
            chat::run(&url, token.as_deref(), height, &assistant_name).await?;
        }
        Some(Command::Token {
            sub,
            name,
            email,
            image,
            ttl_secs,
            secret,
        }) => {
            token::run(
                &sub,
                name.as_deref(),
                email.as_deref(),
                image.as_deref(),
                ttl_secs,
                &secret,
            )?;
        }
        None => {}
    }

    Ok(())
}

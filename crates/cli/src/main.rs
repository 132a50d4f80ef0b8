//! `imagefeed` -- command-line client for the Unsplash photo feed.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                | Description                       |
//! |------------------------|----------|------------------------|-----------------------------------|
//! | `UNSPLASH_ACCESS_KEY`  | yes      | --                     | Application access key            |
//! | `UNSPLASH_SECRET_KEY`  | login    | empty                  | Application secret                |
//! | `IMAGEFEED_TOKEN_PATH` | no       | `imagefeed-token.json` | Where the bearer token is stored  |
//! | `LOG_FORMAT`           | no       | text                   | `json` for JSON log lines         |
//! | `RUST_LOG`             | no       | `imagefeed=info,...`   | Log filter                        |
//!
//! See `UnsplashConfig::from_env` for the remaining Unsplash settings.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use imagefeed_cli::commands;
use imagefeed_cli::session::Session;
use imagefeed_unsplash::UnsplashConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default number of pages loaded by `feed` and `like`.
const DEFAULT_PAGES: u32 = 1;

#[derive(Parser)]
#[command(name = "imagefeed", version, about = "Browse the Unsplash photo feed")]
struct Cli {
    /// File holding the OAuth bearer token.
    #[arg(long, env = "IMAGEFEED_TOKEN_PATH", default_value = "imagefeed-token.json")]
    token_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the authorization URL to open in a browser.
    AuthorizeUrl,
    /// Exchange an authorization code for a token.
    Login { code: String },
    /// Exchange the code carried by a native redirect URL.
    LoginRedirect { url: String },
    /// Print the photo feed as JSON.
    Feed {
        #[arg(long, default_value_t = DEFAULT_PAGES)]
        pages: u32,
    },
    /// Toggle the like flag of a photo in the loaded feed.
    Like {
        photo_id: String,
        #[arg(long, default_value_t = DEFAULT_PAGES)]
        pages: u32,
    },
    /// Print the current user's profile.
    Profile,
    /// Forget the stored token.
    Logout,
}

fn init_tracing() {
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "imagefeed=info,imagefeed_cli=info,imagefeed_services=info,imagefeed_unsplash=warn"
                    .into()
            }),
        )
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = UnsplashConfig::from_env().context("Invalid Unsplash configuration")?;
    let session = Session::build(config, cli.token_path)?;

    match cli.command {
        Command::AuthorizeUrl => commands::authorize_url(&session),
        Command::Login { code } => commands::login(&session, &code).await,
        Command::LoginRedirect { url } => commands::login_redirect(&session, &url).await,
        Command::Feed { pages } => commands::feed(&session, pages).await,
        Command::Like { photo_id, pages } => commands::like(&session, &photo_id, pages).await,
        Command::Profile => commands::profile(&session).await,
        Command::Logout => commands::logout(&session),
    }
}

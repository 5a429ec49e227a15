use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use telegram_bot_runtime::config::file;
use telegram_bot_runtime::{Bot, Config, Poller, UpdateType};

/// tgbot - Telegram Bot API diagnostics
#[derive(Parser)]
#[command(name = "tgbot", version, about)]
struct Cli {
    /// Bot token (overrides the config file)
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the bot's own user record
    Me,
    /// Print incoming updates as JSON lines until Ctrl-C
    Poll {
        /// Resume from this update offset
        #[arg(long)]
        offset: Option<i64>,
        /// Only receive these update types (e.g. message,callback_query)
        #[arg(long, value_delimiter = ',')]
        allowed: Vec<String>,
        /// Remove a configured webhook before polling
        #[arg(long)]
        delete_webhook: bool,
    },
    /// Download a file by id
    Download {
        /// File id from a message
        file_id: String,
        /// Destination path
        dest: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity; logs go to stderr so stdout stays JSON
    let filter = match cli.verbose {
        0 => "warn,telegram_bot_runtime=info",
        1 => "info,telegram_bot_runtime=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // --token wins over TELEGRAM_BOT_TOKEN and the config file
    let token = cli.token;
    let config = Config::from_sources(
        |key| match key {
            "TELEGRAM_BOT_TOKEN" => token.clone(),
            _ => std::env::var(key).ok(),
        },
        file::load_config_file(),
    )
    .context("failed to load configuration")?;
    let bot = Bot::new(&config)?;

    match cli.command {
        Command::Me => cmd_me(&bot).await,
        Command::Poll {
            offset,
            allowed,
            delete_webhook,
        } => cmd_poll(bot, config, offset, &allowed, delete_webhook).await,
        Command::Download { file_id, dest } => cmd_download(&bot, &file_id, &dest).await,
    }
}

async fn cmd_me(bot: &Bot) -> anyhow::Result<()> {
    let me = bot.get_me().await.context("getMe failed")?;
    println!("{}", serde_json::to_string_pretty(&me)?);
    Ok(())
}

async fn cmd_poll(
    bot: Bot,
    mut config: Config,
    offset: Option<i64>,
    allowed: &[String],
    delete_webhook: bool,
) -> anyhow::Result<()> {
    if !allowed.is_empty() {
        let types = allowed
            .iter()
            .map(|key| {
                UpdateType::from_key(key.trim())
                    .with_context(|| format!("unknown update type `{key}`"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        config.polling.allowed_updates = Some(types);
    }

    if delete_webhook {
        bot.delete_webhook(false).await.context("deleteWebhook failed")?;
        tracing::info!("webhook removed");
    }

    let mut poller = Poller::new(bot, config.polling);
    if let Some(offset) = offset {
        poller = poller.with_offset(offset);
    }

    let stop = poller.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current poll");
            stop.stop();
        }
    });

    poller
        .run(|update| async move {
            let line = serde_json::to_string(&update)?;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
            Ok::<_, anyhow::Error>(())
        })
        .await?;

    Ok(())
}

async fn cmd_download(bot: &Bot, file_id: &str, dest: &Path) -> anyhow::Result<()> {
    let file = bot.get_file(file_id).await.context("getFile failed")?;
    let mut sink = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("cannot create {}", dest.display()))?;
    let written = bot.download_file(&file, &mut sink).await?;
    eprintln!("{written} bytes written to {}", dest.display());
    Ok(())
}

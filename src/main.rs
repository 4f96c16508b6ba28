mod commands;
mod conversation;
mod cycle;
mod dialog;
mod gateway;
mod tone;

use clap::{Parser, Subcommand};
use conversation::Conversation;
use pledge_channels::telegram::TelegramChannel;
use pledge_core::{
    clock::parse_tz,
    config::{self, Config},
    profile::Settings,
    traits::{Channel, Provider},
};
use pledge_memory::Store;
use pledge_providers::openai::OpenAiProvider;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "pledge",
    version,
    about = "Pledge: daily commitments, evening reports, weekly reviews"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot: channel listener plus the minute scheduler.
    Start,
    /// Print the configuration summary and collaborator readiness.
    Status,
}

/// Install the stderr subscriber, plus a daily-rolling file when configured.
/// The returned guard must live as long as the process to flush the file.
fn init_logging(cfg: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.pledge.log_level));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if cfg.pledge.log_file.is_empty() {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .init();
        return None;
    }

    let path = std::path::Path::new(&cfg.pledge.log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pledge.log".to_string());
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg);

    match cli.command {
        Commands::Start => {
            let provider = build_provider(&cfg)?;
            if let Some(ref p) = provider {
                if !p.is_available().await {
                    warn!("provider '{}' is not ready, replies will fall back", p.name());
                }
            }

            let channel = build_channel(&cfg)?;
            let defaults = Settings::from(&cfg.profile);
            if let Err(e) = parse_tz(&defaults.timezone) {
                anyhow::bail!("invalid [profile] timezone: {e}");
            }

            let store = Store::new(defaults);
            let conversation = Conversation::new(store, provider);

            info!("{} starting", cfg.pledge.name);
            let gw = Arc::new(gateway::Gateway::new(
                channel,
                conversation,
                cfg.scheduler.enabled,
            ));
            gw.run().await?;
        }
        Commands::Status => {
            println!("{} status\n", cfg.pledge.name);
            println!("Config: {}", cli.config);
            println!("Scheduler: {}", if cfg.scheduler.enabled { "enabled" } else { "disabled" });

            let defaults = Settings::from(&cfg.profile);
            println!(
                "Profile defaults: tone {} | am {} | pm {} | weekly {} {} | deadline {} | tz {}{}",
                defaults.tone,
                defaults.morning_time,
                defaults.evening_time,
                defaults.weekly_review_day,
                defaults.weekly_review_time,
                defaults.deadline_time,
                defaults.timezone,
                if parse_tz(&defaults.timezone).is_ok() {
                    ""
                } else {
                    " (unknown zone)"
                },
            );
            println!();

            match build_provider(&cfg) {
                Ok(Some(p)) => {
                    let ready = if p.requires_api_key() && !p.is_available().await {
                        "missing API key"
                    } else {
                        "ready"
                    };
                    println!("  provider {}: {ready}", p.name());
                }
                Ok(None) => println!("  provider: none (canned replies)"),
                Err(e) => println!("  provider: {e}"),
            }

            match cfg.channel.telegram {
                Some(ref tg) => println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                ),
                None => println!("  telegram: not configured"),
            }
        }
    }

    Ok(())
}

/// Build the configured default responder. `none` means canned replies only.
fn build_provider(cfg: &Config) -> anyhow::Result<Option<Arc<dyn Provider>>> {
    match cfg.provider.default.as_str() {
        "none" | "" => Ok(None),
        "openai" => {
            let oa = cfg.provider.openai.clone().unwrap_or_default();
            if oa.api_key.is_empty() {
                anyhow::bail!(
                    "provider 'openai' selected but api_key is empty. \
                     Set it in config.toml or the OPENAI_API_KEY env var."
                );
            }
            let provider: Arc<dyn Provider> = Arc::new(OpenAiProvider::from_config(&oa));
            Ok(Some(provider))
        }
        other => anyhow::bail!("unsupported provider: {other}"),
    }
}

/// Build the Telegram channel, the only transport shipped.
fn build_channel(cfg: &Config) -> anyhow::Result<Arc<dyn Channel>> {
    match cfg.channel.telegram {
        Some(ref tg) if tg.enabled => {
            if tg.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or TELEGRAM_BOT_TOKEN env var."
                );
            }
            Ok(Arc::new(TelegramChannel::new(tg.clone())))
        }
        _ => anyhow::bail!("No channel enabled. Enable [channel.telegram] in config.toml."),
    }
}

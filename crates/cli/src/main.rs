use std::sync::Arc;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    onair_config::OnairConfig,
    onair_discord::{RemoteLiveControl, run_bot},
    onair_gateway::state::GatewayState,
    onair_live::{ChatCommandHandler, ControlGateway, LiveControl, LiveStore},
    secrecy::Secret,
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "onair", about = "onair: live status flag and fan-message relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway, plus the Discord bot when a token is set.
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Don't start the Discord bot even if a token is configured.
        #[arg(long, default_value_t = false)]
        no_bot: bool,
    },
    /// Run only the Discord bot.
    Bot,
    /// Print the resolved configuration with secrets redacted.
    Config,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn bot_token(config: &OnairConfig) -> Option<Secret<String>> {
    config
        .discord
        .bot_token()
        .map(|token| Secret::new(token.to_string()))
}

async fn serve(
    config: OnairConfig,
    bind: Option<String>,
    port: Option<u16>,
    no_bot: bool,
) -> anyhow::Result<()> {
    let state = GatewayState::from_config(&config);

    match bot_token(&config) {
        Some(token) if !no_bot => {
            let control: Arc<ControlGateway> = Arc::clone(&state.control);
            let commands = ChatCommandHandler::new(control, &config.discord.control_channel);
            tokio::spawn(async move {
                if let Err(e) = run_bot(&token, commands).await {
                    error!(error = %e, "discord bot stopped");
                }
            });
        },
        Some(_) => info!("discord bot disabled by --no-bot"),
        None => info!("no discord bot token configured, chat commands disabled"),
    }

    let bind = bind.unwrap_or(config.server.bind);
    let port = port.unwrap_or(config.server.port);
    onair_gateway::server::start_gateway(&bind, port, state).await
}

async fn bot(config: OnairConfig) -> anyhow::Result<()> {
    let token = bot_token(&config).context("DISCORD_BOT_TOKEN not set")?;

    let control: Arc<dyn LiveControl> = match config.discord.api_base() {
        Some(base) => {
            info!(api_base = base, "toggling live state through remote gateway");
            Arc::new(RemoteLiveControl::new(base, config.live.control_key()))
        },
        None => {
            warn!("no api_base configured, live state is local to this bot process");
            Arc::new(ControlGateway::new(Arc::new(LiveStore::new())))
        },
    };

    run_bot(
        &token,
        ChatCommandHandler::new(control, &config.discord.control_channel),
    )
    .await
}

fn print_config(config: &OnairConfig) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(&config.redacted()).context("serialize config")?;
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "onair starting");

    let config = onair_config::discover_and_load();

    match cli.command {
        Commands::Serve { bind, port, no_bot } => serve(config, bind, port, no_bot).await,
        Commands::Bot => bot(config).await,
        Commands::Config => print_config(&config),
    }
}

use anyhow::Result;
use clap::Parser;
use event_outfitter::app::App;
use event_outfitter::models::Config;
use event_outfitter::server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "event-outfitter")]
#[command(about = "Restyle event photos with AI-suggested outfits")]
struct CliArgs {
    /// Address to bind, overriding HOST.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding PORT.
    #[arg(long, short)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_outfitter=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let app = match App::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Session cache capacity: {}, styles per session: {}",
        config.session_capacity, config.style_count
    );

    if let Err(e) = server::run(app, &config).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

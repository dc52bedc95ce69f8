//! smart-alarm-rs: alarm service with spoken briefings.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use smart_alarm_rs::briefing::HttpBriefings;
use smart_alarm_rs::narrator::{LogNarrator, Narrator, SpeakerNarrator};
use smart_alarm_rs::{api, AlarmHandler, AlarmJournal, AlarmService, Config, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "smart-alarm-rs", about = "Smart alarm service")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Alarm log file (overrides journal.path)
    #[arg(short, long)]
    journal: Option<PathBuf>,

    /// HTTP port (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging (keep HTTP client internals quiet)
    let filter = if args.verbose {
        EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
        EnvFilter::new("info,hyper=warn,reqwest=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("smart-alarm-rs starting");

    let mut config = Config::load(args.config.as_deref());
    if let Some(path) = args.journal {
        config.journal.path = path;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!("Alarm log: {}", config.journal.path.display());

    let narrator: Arc<dyn Narrator> = if config.tts.enabled {
        Arc::new(SpeakerNarrator::new(&config.tts))
    } else {
        info!("Speech disabled, alarm text goes to the log only");
        Arc::new(LogNarrator)
    };
    let handler = AlarmHandler::new(Arc::new(HttpBriefings::new(&config)), narrator);

    // Replay finishes before the API can tick the scheduler
    let service = AlarmService::restore(
        AlarmJournal::new(config.journal.path.clone()),
        handler,
        Arc::new(SystemClock::new(config.clock.timezone)),
        Duration::from_secs(config.news.refresh_interval),
    );
    info!("{} alarms pending after replay", service.alarms().len());

    api::serve(Arc::new(Mutex::new(service)), &config.server.host, config.server.port).await?;

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use huddle::Config;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "huddle", about = "Meeting session core")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/huddle")]
    config: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Huddle v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Capture defaults: {}x{} @ {} fps, audio={}",
        cfg.media.width, cfg.media.height, cfg.media.frame_rate, cfg.media.audio
    );
    info!("Wake word: {:?}", cfg.voice.wake_word);
    info!("Assistant endpoint: {}", cfg.assistant.endpoint);

    let session_config = cfg.session_config(None);
    info!(
        "Session defaults ready (meeting id pattern: {})",
        session_config.meeting_id
    );
    info!("This binary only validates configuration; embed the library to run a meeting.");

    Ok(())
}

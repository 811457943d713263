use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use stratum::LogLevel;
use stratum::core::catalog::Catalog;
use stratum::core::config::{self, CliOverrides};
use stratum::host::Host;
use stratum::host::terminal::TerminalBridge;

#[derive(Parser)]
#[command(name = "stratum", about = "STRATUM studio site in the terminal")]
struct Args {
    /// Site content (TOML); overrides the config file
    #[arg(short, long)]
    content: Option<PathBuf>,

    /// Where sent orders are appended as JSON lines
    #[arg(short, long)]
    outbox: Option<PathBuf>,

    /// Run without a host bridge (no haptics, orders are not delivered)
    #[arg(long)]
    no_bridge: bool,

    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to stratum.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("stratum.log") {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Config unavailable, using defaults: {}", e);
        config::StratumConfig::default()
    });
    let cli = CliOverrides {
        content: args.content,
        outbox: args.outbox,
        no_bridge: args.no_bridge,
    };
    let resolved = config::resolve(&file_config, &cli);

    let catalog = match &resolved.content_file {
        Some(path) => Catalog::load(path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?,
        None => Catalog::stratum(),
    };

    let host = if resolved.bridge_enabled {
        Host::new(
            Some(Box::new(TerminalBridge::new(resolved.outbox.clone()))),
            resolved.haptics,
        )
    } else {
        Host::detached()
    };

    log::info!(
        "Stratum starting up (bridge: {}, outbox: {})",
        host.is_available(),
        resolved.outbox.display()
    );

    stratum::tui::run(&resolved, catalog, host)
}

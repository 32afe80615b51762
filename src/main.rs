use std::fs::File;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use log::{info, warn};
use rentrack::Backend;
use rentrack::core::action::{Action, update};
use rentrack::core::config::{self, CliOverrides, RentrackConfig};
use rentrack::core::kv::{FileKv, KvStore, MemoryKv};
use rentrack::core::ledger::{Ledger, OpenOptions};
use rentrack::core::route::Route;
use rentrack::core::state::App;
use rentrack::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "rentrack", about = "Equipment rental tracker")]
struct Args {
    /// Storage backend for the ledger
    #[arg(short, long, default_value_t, value_enum)]
    backend: Backend,

    /// Directory for the file backend (overrides config and RENTRACK_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Start on this view, e.g. "#/history" or "#/rent/EQ-004"
    #[arg(long, default_value = "#/")]
    route: String,

    /// Replace whatever is stored with the demo data
    #[arg(long)]
    reseed: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to rentrack.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("rentrack.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    info!("Rentrack starting up with backend: {:?}", args.backend);

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Config error, using defaults: {}", e);
        RentrackConfig::default()
    });
    let cli = CliOverrides {
        data_dir: args.data_dir,
    };
    let resolved = config::resolve(&file_config, &cli);

    let store: Box<dyn KvStore> = match args.backend {
        Backend::Memory => Box::new(MemoryKv::default()),
        Backend::File => match FileKv::open(&resolved.data_dir) {
            Ok(kv) => {
                info!("Ledger data in {}", resolved.data_dir.display());
                Box::new(kv)
            }
            Err(e) => {
                warn!(
                    "Cannot use {} ({}); falling back to in-memory store",
                    resolved.data_dir.display(),
                    e
                );
                Box::new(MemoryKv::default())
            }
        },
    };

    let options = OpenOptions {
        reseed_when_empty: resolved.reseed_when_empty,
        force_reseed: args.reseed,
    };
    let ledger = Ledger::open(store, Utc::now(), options);
    let mut app = App::from_config(ledger, &resolved);
    update(&mut app, Action::Navigate(Route::parse(&args.route)));

    tui::run(app)
}

//! `verdictmap`: interactive shell over the judgment database.

mod command;
mod shell;

use clap::Parser;
use shell::ShellError;
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use verdictmap::{Error, config::Config};

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(
    name = "verdictmap",
    version = verdictmap::VERSION,
    about = "Browse judgments and map regional counts"
)]
struct Cli {
    /// JSON config file; flags below override its fields.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite judgment database.
    #[arg(long, env = "VERDICTMAP_DB", value_name = "FILE")]
    db: Option<PathBuf>,

    /// GeoJSON region catalogue.
    #[arg(long, env = "VERDICTMAP_GEOMETRY", value_name = "FILE")]
    geometry: Option<PathBuf>,

    /// Directory of knowledge-graph images named `<jid>.png`.
    #[arg(long, env = "VERDICTMAP_IMAGES", value_name = "DIR")]
    images: Option<PathBuf>,

    /// Rows per page.
    #[arg(long, env = "VERDICTMAP_PAGE_SIZE")]
    page_size: Option<usize>,

    /// Log every page move and join.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(db) = self.db {
            config.database_path = db;
        }
        if let Some(geometry) = self.geometry {
            config.geometry_path = geometry;
        }
        if let Some(images) = self.images {
            config.image_dir = images;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        config.debug |= self.debug;
        config.validate()?;

        Ok(config)
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    init_logging(config.as_ref().is_ok_and(|c| c.debug));

    let result = config
        .map_err(ShellError::from)
        .and_then(|config| shell::run(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "verdictmap stopped");
            ExitCode::FAILURE
        }
    }
}

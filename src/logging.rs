use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::{fs::OpenOptions, path::Path};

/// The alternate screen owns stdout/stderr while running, so logs go to a
/// file. Without one, logging stays off unless `RUST_LOG` asks for it.
pub(crate) fn init(log_file: Option<&Path>) -> Result<()> {
    let mut builder = Builder::new();
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            builder
                .filter_level(LevelFilter::Info)
                .parse_env(Env::default())
                .target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder
                .filter_level(LevelFilter::Off)
                .parse_env(Env::default());
        }
    }
    builder.format_timestamp_millis().try_init()?;
    Ok(())
}

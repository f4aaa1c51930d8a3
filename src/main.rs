mod app;
mod config;
mod input;
mod logging;
mod render;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = config::Args::parse();
    logging::init(args.log_file.as_deref())?;
    let settings = config::resolve(&args)?;
    app::run(settings)
}

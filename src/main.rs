extern crate anyhow;
extern crate clap;
extern crate routeline;
extern crate serde_json;
extern crate tracing;
extern crate tracing_subscriber;

mod cli;
mod logging;

use clap::Parser;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    logging::init();
    let config = args.load_config()?;
    debug!(?config, "starting");
    let output = cli::run(args.command, &config)?;
    println!("{}", output);
    Ok(())
}

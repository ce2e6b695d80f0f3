mod args;
mod mdash;

use clap::Parser;
use log::{debug, warn};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    // RUST_LOG has the last word.
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    if args.config.is_none() && args.corpus.is_empty() {
        eprintln!("Nothing to do: provide a configuration file with --config or party tables with --corpus");
        std::process::exit(2);
    }

    if let Err(e) = mdash::run_from_args(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}

mod args;
mod tally;

use clap::Parser;
use log::{info, LevelFilter};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    info!("args: {:?}", args);

    let res = match args.config.clone() {
        Some(config_path) => {
            tally::run_tally_config(config_path, args.out.clone(), args.reference.clone())
        }
        None => tally::run_tally_input(&args),
    };

    if let Err(e) = res {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

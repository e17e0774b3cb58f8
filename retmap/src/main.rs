use clap::Parser;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

mod cli;
mod run;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    TermLogger::init(
        cli.loglevel,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    let result = match cli.command {
        Commands::Compute(args) => run::run_compute(args),
        Commands::Inspect(args) => run::run_inspect(args),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

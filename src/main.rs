use std::sync::Arc;

use air_digits::cli::{
    apply_overrides, classify, handle_config_action, inspect, load_params, run, Args, Command,
    RunArgs,
};
use air_digits::config::Config;
use air_digits::logging;
use air_digits::network::NetworkParameters;
use clap::Parser;

/// Print the error and exit with status 1.
fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Without a valid parameter file nothing can be recognized.
fn params_or_exit(config: &Config, args: &Args) -> Arc<NetworkParameters> {
    load_params(config, args.params.as_deref()).unwrap_or_else(|e| fail(e))
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = Config::load(args.config.as_deref()).unwrap_or_else(|e| fail(e));

    let command = args
        .command
        .clone()
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    let result = match command {
        Command::Run(run_args) => {
            if let Err(e) = apply_overrides(&mut config, &run_args) {
                fail(e);
            }
            let params = params_or_exit(&config, &args);
            run(&config, &run_args, params)
        }
        Command::Classify { file } => classify(&file, params_or_exit(&config, &args)),
        Command::Inspect => inspect(&params_or_exit(&config, &args)),
        Command::Config { action } => handle_config_action(action, &config, args.config.as_deref()),
    };

    if let Err(e) = result {
        fail(e);
    }
}

use clap::Parser;

use mural_slicer::cli::{
    handle_config_action, run_palette, run_preview, run_slice, Args, Command,
};

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    let config_path = args.config.as_deref();
    let result = match args.command {
        Command::Slice(slice) => run_slice(&slice, config_path).map(|_| ()),
        Command::Preview { document, output } => run_preview(&document, &output),
        Command::Palette { image } => run_palette(&image),
        Command::Config { action } => handle_config_action(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

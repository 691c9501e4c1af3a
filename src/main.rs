use clap::Parser;
use env_logger::Env;
use nasp_tools::cli;
use nasp_tools::commands;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = cli::Args::parse();

    let result = match args.command {
        cli::Commands::Analyze {
            reference,
            duplicates,
            output_dir,
            coverage,
            proportion,
            threads,
            json,
            no_matrices,
            samples,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            reference,
            duplicates,
            output_dir,
            coverage,
            proportion,
            threads,
            json,
            no_matrices,
            samples,
        }),
        cli::Commands::Config { init } => commands::config::run(init),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

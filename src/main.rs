use clap::Parser;
use scaleplot::{Cli, OutputFormatter, OutputMode, ScalePlot, ScaleplotError, UserFriendlyError};
use std::process;

fn main() {
    setup_logging();
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let scaleplot = match ScalePlot::from_cli(&cli) {
        Ok(scaleplot) => scaleplot,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&scaleplot);
    }

    match scaleplot.run() {
        Ok(report) => {
            scaleplot.output_formatter().print_report(&report);
            0
        }
        Err(e) => {
            scaleplot.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &ScaleplotError) -> i32 {
    match error {
        ScaleplotError::Config { .. } | ScaleplotError::InvalidPattern { .. } => 4,
        ScaleplotError::Io(_) | ScaleplotError::ReadFailed { .. } => 5,
        ScaleplotError::Plot { .. } | ScaleplotError::InvalidPlotData { .. } => 6,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "scaleplot.toml".to_string());

    match ScalePlot::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  scaleplot --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(scaleplot: &ScalePlot) -> i32 {
    let formatter = scaleplot.output_formatter();

    formatter.info("DRY RUN MODE - no run outputs will be read");
    formatter.print_separator();
    formatter.print_run_table(&scaleplot.run_table(), scaleplot.config());
    formatter.print_separator();

    0
}

fn print_startup_error(error: &ScaleplotError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("scaleplot=warn"))
        .init();
}

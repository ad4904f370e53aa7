use crate::config::{Axis, CliOverrides, Config};
use crate::error::Result;
use crate::plot::PlotMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scaleplot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plot how simulation run time scales with particle count")]
#[command(
    long_about = "Scaleplot reads the 'Ran in <seconds> seconds' line from the output of each \
                  simulation run, maps every run to its particle count (or resolution) and \
                  renders a log-log scaling plot."
)]
#[command(after_help = "EXAMPLES:\n  \
    scaleplot\n  \
    scaleplot --mode linear --output scaling_linear.png\n  \
    scaleplot --input-pattern 'runs/sph_{label}.out' --axis resolution\n  \
    scaleplot --report scaling.json --output-format json")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Run output path pattern, `{label}` is replaced by each run label
    #[arg(short, long)]
    pub input_pattern: Option<String>,

    /// Output image path
    #[arg(short, long, help = "Where to write the PNG plot")]
    pub output: Option<PathBuf>,

    /// Axis scaling of the plot
    #[arg(short, long, value_enum)]
    pub mode: Option<PlotMode>,

    /// Quantity on the x axis
    #[arg(short, long, value_enum)]
    pub axis: Option<Axis>,

    /// Write the collected timings as JSON
    #[arg(short, long, help = "Path of a JSON report to write")]
    pub report: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be read without reading it)
    #[arg(long, help = "Show the run table and plot target, then exit")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_file_pattern(self.input_pattern.clone())
            .with_axis(self.axis)
            .with_mode(self.mode)
            .with_output_path(self.output.clone())
            .with_report_path(self.report.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod plot;
pub mod report;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{Axis, CliOverrides, Config, PlotConfig, RunConfig};
pub use error::{Result, ScaleplotError, UserFriendlyError};

// Core functionality re-exports
pub use aggregator::{
    build_results, particle_count, Aggregation, Measurement, ResultSet, RunTable, SkipReason,
    SkippedRun,
};
pub use extractor::{extract_seconds, TimingExtractor};
pub use plot::{render, PlotMode, PlotStyle};
pub use report::{ConfigSnapshot, ScalingReport};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use std::time::Instant;

/// Main library interface: collect run timings and plot them.
pub struct ScalePlot {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl ScalePlot {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create ScalePlot instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    pub fn run_table(&self) -> RunTable {
        RunTable::from_config(&self.config.runs)
    }

    /// Read every configured run, printing one diagnostic per skipped run.
    pub fn collect(&self) -> Result<Aggregation> {
        self.output_formatter.start_operation("Reading run outputs");

        let table = self.run_table();
        let progress = self
            .progress_manager
            .create_run_progress(table.labels().len() as u64);
        let started = Instant::now();

        let on_skip = |skipped: &SkippedRun| {
            self.progress_manager
                .suspend(|| self.output_formatter.warning(&skipped.diagnostic()));
        };
        let on_run = |label: &str| {
            progress.set_message(label.to_string());
            progress.inc(1);
        };

        let aggregation = match table.collect(
            &self.config.runs.file_pattern,
            Some(&on_skip),
            Some(&on_run),
        ) {
            Ok(aggregation) => aggregation,
            Err(e) => {
                progress.finish_and_clear();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &progress,
            &format!(
                "Collected {} of {} timings",
                aggregation.results.len(),
                table.labels().len()
            ),
            started.elapsed(),
        );

        for m in &aggregation.results {
            self.output_formatter.debug(&format!(
                "{} -> x = {}, {} s ({})",
                m.label,
                m.independent,
                m.seconds,
                m.source.display()
            ));
        }

        Ok(aggregation)
    }

    /// Collect timings, render the plot and write the optional JSON report.
    ///
    /// Skipped runs are not failures: with no timings at all an empty chart
    /// is still written.
    pub fn run(&self) -> Result<ScalingReport> {
        let aggregation = self.collect()?;

        if aggregation.results.is_empty() {
            self.output_formatter.warning(&format!(
                "No timings collected from {} runs, the plot will be empty",
                aggregation.skipped.len()
            ));
        }

        let plot_config = &self.config.plot;
        self.output_formatter
            .start_operation(&format!("Rendering {} plot", plot_config.mode));
        let spinner = self
            .progress_manager
            .create_spinner(&format!("Rendering {}", plot_config.output_path.display()));
        let rendered = render(
            &aggregation.results,
            plot_config.mode,
            &plot_config.output_path,
            &PlotStyle::from(plot_config),
        );
        spinner.finish_and_clear();
        rendered?;
        self.output_formatter.success(&format!(
            "Saved plot to {}",
            plot_config.output_path.display()
        ));

        let report = ScalingReport::new(&aggregation, &self.config, true);

        if let Some(ref report_path) = plot_config.report_path {
            report.save_json(report_path)?;
            self.output_formatter
                .info(&format!("Wrote report to {}", report_path.display()));
        }

        Ok(report)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ScaleplotError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

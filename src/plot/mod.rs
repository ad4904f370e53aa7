pub mod renderer;

pub use renderer::{axis_range, render, PlotStyle};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Linear axes
    Linear,
    /// Logarithmic x and y axes
    #[value(name = "loglog")]
    LogLog,
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotMode::Linear => f.write_str("linear"),
            PlotMode::LogLog => f.write_str("loglog"),
        }
    }
}

pub mod timing;

pub use timing::{extract_seconds, TimingExtractor, TIMING_PATTERN};

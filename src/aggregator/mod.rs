pub mod results;
pub mod runs;

pub use results::{Measurement, ResultSet};
pub use runs::{
    build_results, particle_count, resolve_path, Aggregation, RunTable, SkipReason, SkippedRun,
};

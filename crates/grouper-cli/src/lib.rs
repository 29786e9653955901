//! Library side of the grouper command line: logging setup and the row
//! pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;

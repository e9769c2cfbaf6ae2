pub mod sink;

pub use sink::{CsvSink, ResultSink};

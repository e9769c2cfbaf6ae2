pub mod finding;
pub mod record;
pub mod verdict;

pub use finding::Finding;
pub use record::OutputRecord;
pub use verdict::{ExecutionStatus, ExploitStatus, Verdict};

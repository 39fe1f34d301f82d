pub mod randomize;

pub use randomize::{Randomize, RunSummary};

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod core;
pub use crate::core::*;

pub mod error;
pub use crate::error::*;

pub mod format;
pub use crate::format::*;

pub mod load;
pub use crate::load::*;

pub mod logging;
pub use crate::logging::*;

pub mod merge;
pub use crate::merge::*;

pub mod normalize;
pub use crate::normalize::*;

pub mod pipeline;
pub use crate::pipeline::*;

pub mod preprocess;
pub use crate::preprocess::*;

pub mod runner;
pub use crate::runner::*;

pub mod table;
pub use crate::table::*;

pub mod write;
pub use crate::write::*;

mod category;
#[allow(clippy::module_inception)]
mod classifier;

pub use category::{categorize, TokenCategory};
pub use classifier::{classify, ClassificationResult};

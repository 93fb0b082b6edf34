//! Branch detection and classification

pub mod category;
pub mod classifier;
pub mod detect;
pub mod pattern;

pub use category::BranchCategory;
pub use classifier::{BranchClassifier, BranchInfo, classify};
pub use detect::BranchSource;
pub use pattern::{BranchMatch, BranchPattern};

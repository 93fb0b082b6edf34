//! Promotion: re-attach previously deployed artifacts instead of rebuilding

pub mod resolver;

pub use resolver::{
  ArtifactRole, PromotedArtifact, PromotionOutcome, PromotionRequest, PromotionResolver, select_source,
};

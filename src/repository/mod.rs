//! Artifact repositories: specs, sessions, resolution, stage refresh and deploy targets

pub mod remote;
pub mod resolver;
pub mod session;
pub mod stage;
pub mod target;

pub use remote::{RemoteRepository, RepositoryDefinition, RepositoryLayout};
pub use resolver::{ArtifactResolver, FileSystemResolver, ResolveFailure};
pub use session::ResolutionSession;
pub use stage::{StageRefresh, external_dependencies, refresh_stage_dependencies};
pub use target::{DeployTarget, RepositorySlot, RepositorySpecs, retarget, slot_for};

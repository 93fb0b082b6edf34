//! Placeholder expansion and branch-derived properties

pub mod branch;
pub mod buffer;
pub mod guard;
pub mod mapper;
pub mod resolver;

pub use branch::branch_properties;
pub use buffer::ExpansionBuffer;
pub use guard::CircularDefinitionGuard;
pub use mapper::{PropertyMapper, PropertyTransform};
pub use resolver::{ENV_PREFIX, Properties, PropertyResolver, has_unresolved_placeholders, resolve};

//! Artifact coordinates, catalogs and build outputs

pub mod catalog;
pub mod coordinate;
pub mod digest;
pub mod outputs;

pub use catalog::{CATALOG_CLASSIFIER, CATALOG_EXTENSION, HEADER, catalog_coordinate};
pub use coordinate::{Coordinate, DEFAULT_EXTENSION};
pub use digest::sha256_hex;
pub use outputs::{BuildOutput, BuildOutputs, catalog_outputs, extension_for, primary_coordinate};

//! # Vertexwise Surface
//!
//! Surface-map decoding and the vertex-level types shared by the rest of the
//! workspace.
//!
//! A surface map is a flat per-vertex scalar array at the mesh's native
//! resolution. Files on disk may have been written on machines with a
//! different byte order; decoders normalize values to native order before
//! anything downstream compares or reduces them.

mod error;
mod mgh;
mod types;

pub use error::{Result, SurfaceError};
pub use mgh::{test_support, MghDecoder};
pub use types::{ByteOrder, DecodedMap, HemiPair, Hemisphere, SurfaceVector};

use std::path::Path;

/// Opaque "file -> flat numeric array" collaborator.
///
/// Implementations own the format details (header layout, element types,
/// byte-order detection); callers only see native-order f32 values.
pub trait MapDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedMap>;
}

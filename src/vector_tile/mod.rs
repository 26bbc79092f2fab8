//! Codec for Mapbox Vector Tiles (MVT v2).
//!
//! Decodes a gzip-framed protobuf tile into an owned structure and encodes it
//! back. Feature geometry is carried as an opaque command stream; the
//! transformer never interprets it, so the codec never parses it.

mod feature;
mod geometry_type;
mod layer;
mod tile;
mod value;

pub use feature::TileFeature;
pub use geometry_type::GeomType;
pub use layer::TileLayer;
pub use tile::VectorTile;
pub use value::TileValue;

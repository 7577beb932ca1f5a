mod overpass_types;

pub use overpass_types::*;

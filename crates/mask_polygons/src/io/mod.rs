pub mod annotation;
pub mod geojson;
pub mod raster;

pub use annotation::*;
pub use raster::*;

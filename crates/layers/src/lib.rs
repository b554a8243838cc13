pub mod index;
pub mod network_layer;
pub mod picking;
pub mod raster;
pub mod symbology;

pub use index::*;
pub use network_layer::*;
pub use picking::*;
pub use raster::*;
pub use symbology::*;

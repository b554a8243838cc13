pub mod basemap;

pub use basemap::*;

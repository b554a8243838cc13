pub mod light;
pub mod material;
pub mod mesh;

pub use light::*;
pub use material::*;
pub use mesh::*;

pub mod geodesy;
pub mod interp;
pub mod precision;
pub mod projection;
pub mod vec;

pub use geodesy::*;
pub use interp::*;
pub use precision::*;
pub use projection::*;
pub use vec::*;

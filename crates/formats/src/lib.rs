pub mod document;
pub mod network_loader;
pub mod xml;

pub use document::*;
pub use network_loader::*;

pub mod color;
pub mod ids;
pub mod length;
pub mod values;

pub use color::Color;
pub use ids::{Location, NodeId, Symbol};
pub use length::LengthSpec;
pub use values::{DisplayAlignment, FontPosture, FontWeight, Lines, Quadding};

pub use error::*;
pub use generator::*;
pub use grid::*;
pub use movement::*;
pub use session::*;
pub use visibility::*;

pub mod error;
pub mod generator;
pub mod grid;
pub mod movement;
pub mod render;
pub mod session;
pub mod visibility;

//! Color and color-stop model.
//!
//! Scope:
//! - 8-bit straight-alpha colors and the packed pixel layout
//! - raw stop records and the validated [`ColorStopTable`]

pub mod color;
pub mod gradient;

pub use color::{AMASK, BMASK, GMASK, RMASK, Rgba8};
pub use gradient::{ColorStop, ColorStopTable, RawColorStop, StopRecord};

// geom/ - Angle and curve math
//
// Pure functions. No state, nothing the simulation owns.

mod angle;
mod curve;

pub use angle::*;
pub use curve::*;

pub type Point = [f32; 2];

pub mod coord;
pub mod bit;

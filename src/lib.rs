//! Reading and writing block schematics in the Sponge and legacy MCEdit formats.

pub mod nbt;
pub mod world;
pub mod ioext;
pub mod error;
pub mod math;

pub use flate2;

pub use error::McError;
pub use error::McResult;

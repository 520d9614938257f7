pub mod blockstate;
pub mod legacyid;
pub mod palette;
pub mod voxelgrid;
pub mod schematic;
pub mod io;

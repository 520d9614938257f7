use crate::{
	McResult,
	math::coord::Coord3,
	nbt::Map,
};

use super::{
	blockstate::BlockState,
	palette::{Palette, PaletteType},
	voxelgrid::VoxelGrid,
};

/// A cuboid of block states: a [VoxelGrid] of palette IDs, the [Palette]
/// that gives them meaning, and any metadata carried along with the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Schematic {
	grid: VoxelGrid,
	palette: Palette,
	metadata: Option<Map>,
}

impl Schematic {
	pub fn new(grid: VoxelGrid, palette: Palette, metadata: Option<Map>) -> Self {
		Self {
			grid,
			palette,
			metadata,
		}
	}

	pub fn builder() -> SchematicBuilder {
		SchematicBuilder::new()
	}

	pub fn grid(&self) -> &VoxelGrid {
		&self.grid
	}

	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	pub fn metadata(&self) -> Option<&Map> {
		self.metadata.as_ref()
	}

	pub fn metadata_mut(&mut self) -> &mut Option<Map> {
		&mut self.metadata
	}

	pub fn size(&self) -> (u32, u32, u32) {
		self.grid.size()
	}

	/// Offset of the structure from the origin of the parent space.
	/// This is the negated minimum corner of the grid.
	pub fn offset(&self) -> Coord3 {
		-self.grid.min_corner()
	}

	/// Block state at a position in the parent space.
	pub fn get_block(&self, pos: Coord3) -> McResult<BlockState> {
		let id = self.grid.get_block(pos)?;
		self.palette.value_for(id)
	}

	/// Sets the block state at a position in the parent space, registering
	/// the state if the palette is local.
	pub fn set_block(&mut self, pos: Coord3, state: &BlockState) -> McResult<()> {
		// Bounds check first so that a failed write doesn't grow the palette.
		self.grid.get_block(pos)?;
		let id = self.palette.id_for(state)?;
		self.grid.set_block(pos, id)?;
		Ok(())
	}

	pub fn into_parts(self) -> (VoxelGrid, Palette, Option<Map>) {
		(self.grid, self.palette, self.metadata)
	}
}

/// Builds a [Schematic] by sampling a block state for every position.
///
/// ```no_run,rust
/// # use mcschem::{blockstate, math::coord::Coord3, world::schematic::Schematic};
/// let schematic = Schematic::builder()
/// 	.origin(Coord3::new(-8, 64, -8))
/// 	.size(16, 4, 16)
/// 	.build_from(|pos| if pos.y == 64 { blockstate!(stone) } else { blockstate!(air) })
/// 	.unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SchematicBuilder {
	palette: Option<Palette>,
	origin: Coord3,
	size: (u32, u32, u32),
	metadata: Option<Map>,
}

impl SchematicBuilder {
	pub fn new() -> Self {
		Self {
			palette: None,
			origin: Coord3::ZERO,
			size: (1, 1, 1),
			metadata: None,
		}
	}

	/// Start from an empty palette of the given kind. The default is local.
	pub fn palette_type(mut self, palette_type: PaletteType) -> Self {
		self.palette = Some(Palette::from_type(palette_type));
		self
	}

	/// Start from an existing palette. Its entries keep their IDs.
	pub fn palette(mut self, palette: Palette) -> Self {
		self.palette = Some(palette);
		self
	}

	/// Minimum corner of the area in the parent space.
	pub fn origin(mut self, origin: Coord3) -> Self {
		self.origin = origin;
		self
	}

	pub fn size(mut self, width: u32, height: u32, length: u32) -> Self {
		self.size = (width, height, length);
		self
	}

	pub fn metadata(mut self, metadata: Map) -> Self {
		self.metadata = Some(metadata);
		self
	}

	/// Calls `block_at` once per position, in grid index order.
	///
	/// The storage width of the grid is picked after the whole area has been
	/// sampled, so it fits the final palette.
	pub fn build_from<F: FnMut(Coord3) -> BlockState>(self, mut block_at: F) -> McResult<Schematic> {
		let (width, height, length) = VoxelGrid::check_size(self.size.0, self.size.1, self.size.2)?;
		let mut palette = self.palette.unwrap_or_else(Palette::local);
		let volume = width as usize * height as usize * length as usize;
		let mut ids = Vec::with_capacity(volume);
		for y in 0..height as i32 {
			for z in 0..length as i32 {
				for x in 0..width as i32 {
					let pos = self.origin + Coord3::new(x, y, z);
					ids.push(palette.id_for(&block_at(pos))?);
				}
			}
		}
		let mut grid = VoxelGrid::new(
			width as u32,
			height as u32,
			length as u32,
			self.origin,
			palette.storage_width(),
		)?;
		for (index, id) in ids.into_iter().enumerate() {
			grid.set_index(index, id)?;
		}
		log::debug!(
			"Built {width}x{height}x{length} schematic with {} palette entries.",
			palette.size()
		);
		Ok(Schematic::new(grid, palette, self.metadata))
	}
}

impl Default for SchematicBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		McError,
		blockstate,
		world::{
			palette::GLOBAL_PALETTE,
			voxelgrid::StorageWidth,
		},
	};

	#[test]
	fn build_local() {
		let origin = Coord3::new(10, -5, 3);
		let schematic = Schematic::builder()
			.origin(origin)
			.size(3, 2, 4)
			.build_from(|pos| if pos.y == -5 { blockstate!(stone) } else { blockstate!(air) })
			.unwrap();
		assert_eq!(schematic.size(), (3, 2, 4));
		assert_eq!(schematic.offset(), Coord3::new(-10, 5, -3));
		assert_eq!(schematic.palette().palette_type(), PaletteType::Local);
		assert_eq!(schematic.palette().size(), 2);
		assert_eq!(schematic.grid().storage_width(), StorageWidth::Byte);
		// The first sampled position is registered first.
		assert_eq!(schematic.grid().get_cell(0, 0, 0).unwrap(), 0);
		assert_eq!(schematic.get_block(origin).unwrap(), blockstate!(stone));
		assert_eq!(schematic.get_block(Coord3::new(12, -4, 6)).unwrap(), blockstate!(air));
		assert!(matches!(schematic.get_block(Coord3::ZERO), Err(McError::OutOfBounds { .. })));
	}

	#[test]
	fn build_global() {
		let schematic = Schematic::builder()
			.palette_type(PaletteType::Global)
			.size(2, 1, 1)
			.build_from(|pos| if pos.x == 0 { blockstate!(wool[data=3]) } else { blockstate!(glass) })
			.unwrap();
		assert_eq!(schematic.grid().storage_width(), StorageWidth::Short);
		assert_eq!(schematic.grid().get_cell(0, 0, 0).unwrap(), (35 << 4) | 3);
		assert_eq!(schematic.grid().get_cell(1, 0, 0).unwrap(), GLOBAL_PALETTE.id_for(&blockstate!(glass)).unwrap());
		let failed = Schematic::builder()
			.palette_type(PaletteType::Global)
			.build_from(|_| blockstate!(modded:machine));
		assert!(matches!(failed, Err(McError::UnsupportedValue(_))));
	}

	#[test]
	fn set_block_registers_states() {
		let mut schematic = Schematic::builder()
			.size(2, 2, 2)
			.build_from(|_| BlockState::air())
			.unwrap();
		let pos = Coord3::new(1, 1, 0);
		schematic.set_block(pos, &blockstate!(gold_block)).unwrap();
		assert_eq!(schematic.get_block(pos).unwrap(), blockstate!(gold_block));
		assert_eq!(schematic.palette().size(), 2);
		assert!(schematic.set_block(Coord3::new(2, 0, 0), &blockstate!(dirt)).is_err());
		assert_eq!(schematic.palette().size(), 2);
	}

	#[test]
	fn invalid_sizes() {
		let result = Schematic::builder().size(70000, 1, 1).build_from(|_| BlockState::air());
		assert!(matches!(result, Err(McError::SizeExceeded { axis: "width", .. })));
		let result = Schematic::builder().size(1, 0, 1).build_from(|_| BlockState::air());
		assert!(matches!(result, Err(McError::InvalidDimension { axis: "height" })));
	}
}

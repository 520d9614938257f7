use crate::{
	McError,
	McResult,
	math::coord::Coord3,
};

/// The largest allowed size on any axis.
pub const MAX_SIZE: u32 = 65535;

/// Width of a single cell in a [VoxelGrid].
/// Chosen once from the palette size and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageWidth {
	Byte,
	Short,
	Int,
}

impl StorageWidth {
	/// `palette_max <= 0xFF` is stored in bytes, `<= 0xFFFF` in shorts, anything
	/// larger in ints. The boundaries match the files that are already out there.
	pub const fn for_palette_max(palette_max: u32) -> Self {
		if palette_max <= 0xFF {
			StorageWidth::Byte
		} else if palette_max <= 0xFFFF {
			StorageWidth::Short
		} else {
			StorageWidth::Int
		}
	}

	/// Size of a cell in bytes.
	pub const fn bytes(self) -> usize {
		match self {
			StorageWidth::Byte => 1,
			StorageWidth::Short => 2,
			StorageWidth::Int => 4,
		}
	}

	/// The largest ID that can be stored.
	pub const fn max_id(self) -> u32 {
		match self {
			StorageWidth::Byte => u8::MAX as u32,
			StorageWidth::Short => u16::MAX as u32,
			StorageWidth::Int => u32::MAX,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cells {
	Byte(Box<[u8]>),
	Short(Box<[u16]>),
	Int(Box<[u32]>),
}

impl Cells {
	fn new(width: StorageWidth, count: usize) -> Self {
		match width {
			StorageWidth::Byte => Cells::Byte(vec![0; count].into_boxed_slice()),
			StorageWidth::Short => Cells::Short(vec![0; count].into_boxed_slice()),
			StorageWidth::Int => Cells::Int(vec![0; count].into_boxed_slice()),
		}
	}

	fn width(&self) -> StorageWidth {
		match self {
			Cells::Byte(_) => StorageWidth::Byte,
			Cells::Short(_) => StorageWidth::Short,
			Cells::Int(_) => StorageWidth::Int,
		}
	}

	fn get(&self, index: usize) -> Option<u32> {
		match self {
			Cells::Byte(cells) => cells.get(index).map(|&id| id as u32),
			Cells::Short(cells) => cells.get(index).map(|&id| id as u32),
			Cells::Int(cells) => cells.get(index).copied(),
		}
	}

	/// Writes the id and returns the previous one.
	/// `index` must already be bounds checked.
	fn set(&mut self, index: usize, id: u32) -> McResult<u32> {
		let width = self.width();
		let overflow = |_| McError::StorageOverflow {
			id,
			width,
		};
		Ok(match self {
			Cells::Byte(cells) => {
				let id = u8::try_from(id).map_err(overflow)?;
				std::mem::replace(&mut cells[index], id) as u32
			},
			Cells::Short(cells) => {
				let id = u16::try_from(id).map_err(overflow)?;
				std::mem::replace(&mut cells[index], id) as u32
			},
			Cells::Int(cells) => std::mem::replace(&mut cells[index], id),
		})
	}
}

/// A cuboid of palette IDs.
///
/// Cells are stored in `(y * length + z) * width + x` order. Local coordinates
/// run from `0` to the size on each axis; block positions are in the parent
/// space and are translated by `min_corner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
	size: (u16, u16, u16),
	min: Coord3,
	cells: Cells,
}

impl VoxelGrid {
	pub fn new(width: u32, height: u32, length: u32, min_corner: Coord3, storage: StorageWidth) -> McResult<Self> {
		let (width, height, length) = Self::check_size(width, height, length)?;
		let count = width as usize * height as usize * length as usize;
		Ok(Self {
			size: (width, height, length),
			min: min_corner,
			cells: Cells::new(storage, count),
		})
	}

	/// Verifies that every axis is in `1..=65535`.
	pub fn check_size(width: u32, height: u32, length: u32) -> McResult<(u16, u16, u16)> {
		let check = |axis: &'static str, value: u32| -> McResult<u16> {
			if value == 0 {
				return Err(McError::InvalidDimension { axis });
			}
			u16::try_from(value).map_err(|_| McError::SizeExceeded {
				axis,
				found: value,
				max: MAX_SIZE,
			})
		};
		Ok((
			check("width", width)?,
			check("height", height)?,
			check("length", length)?,
		))
	}

	pub fn width(&self) -> u32 {
		self.size.0 as u32
	}

	pub fn height(&self) -> u32 {
		self.size.1 as u32
	}

	pub fn length(&self) -> u32 {
		self.size.2 as u32
	}

	/// `(width, height, length)`
	pub fn size(&self) -> (u32, u32, u32) {
		(self.width(), self.height(), self.length())
	}

	/// The number of cells.
	pub fn volume(&self) -> usize {
		self.width() as usize * self.height() as usize * self.length() as usize
	}

	pub fn min_corner(&self) -> Coord3 {
		self.min
	}

	/// The inclusive upper corner in the parent space.
	pub fn max_corner(&self) -> Coord3 {
		self.min + Coord3::new(
			self.width() as i32 - 1,
			self.height() as i32 - 1,
			self.length() as i32 - 1,
		)
	}

	pub fn storage_width(&self) -> StorageWidth {
		self.cells.width()
	}

	/// Linear index of a local coordinate.
	pub fn index(&self, x: i64, y: i64, z: i64) -> Option<usize> {
		let (width, height, length) = self.size;
		if x < 0 || x >= width as i64
		|| y < 0 || y >= height as i64
		|| z < 0 || z >= length as i64 {
			return None;
		}
		let (width, length) = (width as usize, length as usize);
		let (x, y, z) = (x as usize, y as usize, z as usize);
		Some((y * length + z) * width + x)
	}

	/// Local coordinate of a linear index.
	pub fn position(&self, index: usize) -> (u32, u32, u32) {
		let width = self.width() as usize;
		let layer = width * self.length() as usize;
		let y = index / layer;
		let z = (index % layer) / width;
		let x = (index % layer) % width;
		(x as u32, y as u32, z as u32)
	}

	pub fn get_cell(&self, x: i64, y: i64, z: i64) -> McResult<u32> {
		self.index(x, y, z)
			.and_then(|index| self.cells.get(index))
			.ok_or(McError::OutOfBounds { x, y, z })
	}

	/// Sets the ID of a cell and returns the previous ID.
	pub fn set_cell(&mut self, x: i64, y: i64, z: i64, id: u32) -> McResult<u32> {
		let index = self.index(x, y, z).ok_or(McError::OutOfBounds { x, y, z })?;
		self.cells.set(index, id)
	}

	fn local(&self, pos: Coord3) -> (i64, i64, i64) {
		(
			pos.x as i64 - self.min.x as i64,
			pos.y as i64 - self.min.y as i64,
			pos.z as i64 - self.min.z as i64,
		)
	}

	fn out_of_bounds(pos: Coord3) -> McError {
		McError::OutOfBounds {
			x: pos.x as i64,
			y: pos.y as i64,
			z: pos.z as i64,
		}
	}

	/// Gets the ID at a position in the parent space.
	pub fn get_block(&self, pos: Coord3) -> McResult<u32> {
		let (x, y, z) = self.local(pos);
		self.get_cell(x, y, z).map_err(|_| Self::out_of_bounds(pos))
	}

	/// Sets the ID at a position in the parent space and returns the previous ID.
	pub fn set_block(&mut self, pos: Coord3, id: u32) -> McResult<u32> {
		let (x, y, z) = self.local(pos);
		let index = self.index(x, y, z).ok_or(Self::out_of_bounds(pos))?;
		self.cells.set(index, id)
	}

	pub fn get_index(&self, index: usize) -> Option<u32> {
		self.cells.get(index)
	}

	pub fn set_index(&mut self, index: usize, id: u32) -> McResult<u32> {
		if index >= self.volume() {
			let (x, y, z) = self.position(index);
			return Err(McError::OutOfBounds {
				x: x as i64,
				y: y as i64,
				z: z as i64,
			});
		}
		self.cells.set(index, id)
	}

	/// Every ID in linear index order.
	pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
		(0..self.volume()).filter_map(move |index| self.cells.get(index))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn storage_width_boundaries() {
		let widths = [1u32, 255, 256, 257, 65535, 65536, 65537]
			.map(|size| StorageWidth::for_palette_max(size).bytes());
		assert_eq!(widths, [1, 1, 2, 2, 2, 4, 4]);
	}

	#[test]
	fn size_limits() {
		assert!(VoxelGrid::new(65535, 1, 1, Coord3::ZERO, StorageWidth::Byte).is_ok());
		assert!(matches!(
			VoxelGrid::new(1, 65536, 1, Coord3::ZERO, StorageWidth::Byte),
			Err(McError::SizeExceeded { axis: "height", found: 65536, max: MAX_SIZE })
		));
		assert!(matches!(
			VoxelGrid::new(1, 1, 0, Coord3::ZERO, StorageWidth::Byte),
			Err(McError::InvalidDimension { axis: "length" })
		));
	}

	#[test]
	fn index_order() {
		let grid = VoxelGrid::new(3, 4, 5, Coord3::ZERO, StorageWidth::Byte).unwrap();
		assert_eq!(grid.volume(), 60);
		assert_eq!(grid.index(0, 0, 0), Some(0));
		assert_eq!(grid.index(1, 0, 0), Some(1));
		assert_eq!(grid.index(0, 0, 1), Some(3));
		assert_eq!(grid.index(0, 1, 0), Some(15));
		assert_eq!(grid.index(2, 3, 4), Some(59));
		assert_eq!(grid.index(3, 0, 0), None);
		assert_eq!(grid.index(0, -1, 0), None);
		for index in 0..grid.volume() {
			let (x, y, z) = grid.position(index);
			assert_eq!(grid.index(x as i64, y as i64, z as i64), Some(index));
		}
	}

	#[test]
	fn cells_and_blocks() {
		let mut grid = VoxelGrid::new(2, 2, 2, Coord3::new(-10, 64, 5), StorageWidth::Short).unwrap();
		assert_eq!(grid.max_corner(), Coord3::new(-9, 65, 6));
		assert_eq!(grid.set_block(Coord3::new(-9, 64, 6), 300).unwrap(), 0);
		assert_eq!(grid.get_cell(1, 0, 1).unwrap(), 300);
		assert_eq!(grid.set_cell(1, 0, 1, 7).unwrap(), 300);
		assert_eq!(grid.get_block(Coord3::new(-9, 64, 6)).unwrap(), 7);
		assert!(matches!(
			grid.get_block(Coord3::new(0, 0, 0)),
			Err(McError::OutOfBounds { x: 0, y: 0, z: 0 })
		));
		assert!(matches!(grid.set_cell(2, 0, 0, 1), Err(McError::OutOfBounds { .. })));
		assert_eq!(grid.ids().collect::<Vec<_>>(), vec![0, 0, 0, 0, 0, 7, 0, 0]);
	}

	#[test]
	fn storage_overflow() {
		let mut grid = VoxelGrid::new(1, 1, 1, Coord3::ZERO, StorageWidth::Byte).unwrap();
		assert!(grid.set_cell(0, 0, 0, 255).is_ok());
		assert!(matches!(
			grid.set_cell(0, 0, 0, 256),
			Err(McError::StorageOverflow { id: 256, width: StorageWidth::Byte })
		));
		assert_eq!(grid.get_cell(0, 0, 0).unwrap(), 255);
	}
}

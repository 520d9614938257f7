//! The legacy MCEdit ("Alpha") schematic format.
//!
//! Each block is split over three arrays: `Blocks` holds the low 8 bits of the
//! block ID, `Data` holds the 4-bit data value and the optional `AddBlocks`
//! holds the high 4 bits of the block ID, packed two to a byte.
//! Schematics that declare `Sponge` materials are handed to [sponge::decode].

use std::collections::{HashMap, hash_map::Entry};

use crate::{
	McError,
	McResult,
	math::{
		bit::{Nibbles, nibble_len},
		coord::Coord3,
	},
	nbt::{
		DataView,
		DataViewMut,
		Map,
	},
	world::{
		palette::*,
		schematic::Schematic,
		voxelgrid::{StorageWidth, VoxelGrid},
	},
};

use super::{
	read_dimensions,
	sponge,
	write_dimensions,
};

/// `Materials` value that marks a legacy schematic.
pub const MATERIALS: &str = "Alpha";

fn check_length(field: &'static str, array: &[u8], expected: usize) -> McResult<()> {
	if array.len() < expected {
		return Err(McError::InvalidArrayLength {
			field,
			expected,
			found: array.len(),
		});
	}
	Ok(())
}

/// Decodes a legacy schematic, or a Sponge schematic if `Materials` says so.
/// A missing `Materials` field is treated as Sponge.
pub fn decode<V: DataView>(view: &V) -> McResult<Schematic> {
	let materials = view_field!(view; "Materials" => Option<get_string>).unwrap_or(sponge::MATERIALS);
	if materials.eq_ignore_ascii_case(sponge::MATERIALS) {
		log::debug!("Schematic declares {materials} materials, decoding as Sponge.");
		return sponge::decode(view);
	}
	if !materials.eq_ignore_ascii_case(MATERIALS) {
		log::warn!("Rejecting schematic with unknown materials {materials:?}.");
		return Err(McError::UnknownFormat(materials.to_owned()));
	}
	let (width, height, length) = read_dimensions(view)?;
	let offset = Coord3::new(
		view_field!(view; "WEOffsetX" => Option<get_int>).unwrap_or(0),
		view_field!(view; "WEOffsetY" => Option<get_int>).unwrap_or(0),
		view_field!(view; "WEOffsetZ" => Option<get_int>).unwrap_or(0),
	);
	let volume = width as usize * height as usize * length as usize;
	let blocks = view_field!(view; "Blocks" => get_byte_array);
	let data = view_field!(view; "Data" => get_byte_array);
	let add_blocks = view_field!(view; "AddBlocks" => Option<get_byte_array>);
	check_length("Blocks", blocks, volume)?;
	check_length("Data", data, volume)?;
	if let Some(add_blocks) = add_blocks {
		check_length("AddBlocks", add_blocks, nibble_len(volume))?;
	}
	let mut grid = VoxelGrid::new(width, height, length, -offset, StorageWidth::Short)?;
	for index in 0..volume {
		let add = add_blocks.map_or(0, |add_blocks| add_blocks.get_nibble(index));
		// Always within the global palette.
		let id = ((add as u32) << 12)
			| ((blocks[index] as u32) << 4)
			| (data[index] & 0xF) as u32;
		let (x, y, z) = grid.position(index);
		grid.set_block(Coord3::new(x as i32, y as i32, z as i32) - offset, id)?;
	}
	let metadata = view_field!(view; "Metadata" => Option<get_view>).cloned();
	log::debug!(
		"Decoded legacy schematic {width}x{height}x{length} at offset {offset}{}.",
		if add_blocks.is_some() { " with AddBlocks" } else { "" },
	);
	Ok(Schematic::new(grid, Palette::Global, metadata))
}

/// Encodes a schematic into an existing view.
/// Local palettes are translated to the global numbering, so every state
/// in the schematic must have a legacy ID.
pub fn encode_into<V: DataViewMut>(schematic: &Schematic, view: &mut V) -> McResult<()> {
	let grid = schematic.grid();
	let volume = grid.volume();
	let mut blocks = vec![0u8; volume];
	let mut data = vec![0u8; volume];
	let mut add_blocks: Option<Vec<u8>> = None;
	let mut translated = HashMap::<u32, u32>::new();
	for (index, id) in grid.ids().enumerate() {
		let global_id = match schematic.palette() {
			Palette::Global if id < GlobalPalette::SIZE => id,
			Palette::Global => return Err(McError::UnknownId(id)),
			Palette::Local(palette) => match translated.entry(id) {
				Entry::Occupied(entry) => *entry.get(),
				Entry::Vacant(entry) => *entry.insert(GLOBAL_PALETTE.id_for(palette.value_for(id)?)?),
			},
		};
		let block_id = global_id >> 4;
		blocks[index] = block_id as u8;
		data[index] = (global_id & 0xF) as u8;
		if block_id > 0xFF {
			add_blocks.get_or_insert_with(|| vec![0u8; nibble_len(volume)])
				.set_nibble(index, (block_id >> 8) as u8);
		}
	}
	let offset = schematic.offset();
	view.set("Materials", MATERIALS);
	write_dimensions(view, grid);
	view.set("WEOffsetX", offset.x);
	view.set("WEOffsetY", offset.y);
	view.set("WEOffsetZ", offset.z);
	view.set_byte_array("Blocks", &blocks);
	view.set_byte_array("Data", &data);
	if let Some(add_blocks) = &add_blocks {
		view.set_byte_array("AddBlocks", add_blocks);
	}
	if let Some(metadata) = schematic.metadata() {
		view.set("Metadata", metadata.clone());
	}
	let (width, height, length) = grid.size();
	log::debug!(
		"Encoded legacy schematic {width}x{height}x{length}{}.",
		if add_blocks.is_some() { " with AddBlocks" } else { "" },
	);
	Ok(())
}

/// Encodes a schematic into a new compound.
pub fn encode(schematic: &Schematic) -> McResult<Map> {
	let mut map = Map::new();
	encode_into(schematic, &mut map)?;
	Ok(map)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		blockstate,
		world::blockstate::BlockState,
	};
	use rand::{Rng, SeedableRng, rngs::StdRng};

	/// Builds a global schematic from block IDs in grid index order.
	fn from_block_ids(size: (u32, u32, u32), origin: Coord3, block_ids: &[u32]) -> Schematic {
		let mut grid = VoxelGrid::new(size.0, size.1, size.2, origin, StorageWidth::Short).unwrap();
		for (index, block_id) in block_ids.iter().enumerate() {
			grid.set_index(index, block_id << 4).unwrap();
		}
		Schematic::new(grid, Palette::Global, None)
	}

	#[test]
	fn extended_ids_use_add_blocks() {
		let schematic = from_block_ids((2, 1, 2), Coord3::ZERO, &[0, 1, 300, 2]);
		let map = encode(&schematic).unwrap();
		assert_eq!(map.get_string("Materials").unwrap(), Some("Alpha"));
		assert_eq!(map.get_byte_array("Blocks").unwrap(), Some(&[0u8, 1, 0x2C, 2][..]));
		assert_eq!(map.get_byte_array("Data").unwrap(), Some(&[0u8; 4][..]));
		assert_eq!(map.get_byte_array("AddBlocks").unwrap(), Some(&[0x00u8, 0x01][..]));
		let decoded = decode(&map).unwrap();
		assert_eq!(decoded.grid().ids().collect::<Vec<_>>(), vec![0, 1 << 4, 300 << 4, 2 << 4]);
		assert_eq!(decoded.get_block(Coord3::new(0, 0, 1)).unwrap(), BlockState::from("legacy:300"));
	}

	#[test]
	fn no_add_blocks_below_256() {
		let mut rng = StdRng::seed_from_u64(7);
		let schematic = Schematic::builder()
			.palette_type(crate::world::palette::PaletteType::Global)
			.origin(Coord3::new(-3, 10, 2))
			.size(5, 3, 4)
			.build_from(|_| GLOBAL_PALETTE.value_for(rng.gen_range(0..0x1000)).unwrap())
			.unwrap();
		let map = encode(&schematic).unwrap();
		assert!(!map.contains_key("AddBlocks"));
		assert_eq!(map.get_int("WEOffsetX").unwrap(), Some(3));
		assert_eq!(map.get_int("WEOffsetY").unwrap(), Some(-10));
		assert_eq!(map.get_int("WEOffsetZ").unwrap(), Some(-2));
		let decoded = decode(&map).unwrap();
		assert_eq!(decoded, schematic);
	}

	#[test]
	fn extended_ids_round_trip() {
		let mut rng = StdRng::seed_from_u64(42);
		let ids = (0..3 * 3 * 3)
			.map(|_| rng.gen_range(0..0x10000u32))
			.collect::<Vec<_>>();
		let mut grid = VoxelGrid::new(3, 3, 3, Coord3::new(1, 2, 3), StorageWidth::Short).unwrap();
		for (index, id) in ids.iter().enumerate() {
			grid.set_index(index, *id).unwrap();
		}
		let schematic = Schematic::new(grid, Palette::Global, None);
		let map = encode(&schematic).unwrap();
		let add_blocks = map.get_byte_array("AddBlocks").unwrap().unwrap();
		assert_eq!(add_blocks.len(), 14);
		for (index, id) in ids.iter().enumerate() {
			assert_eq!(add_blocks.get_nibble(index) as u32, id >> 12);
		}
		let decoded = decode(&map).unwrap();
		assert_eq!(decoded.grid().ids().collect::<Vec<_>>(), ids);
		assert_eq!(decoded.offset(), Coord3::new(-1, -2, -3));
	}

	#[test]
	fn local_palettes_are_translated() {
		let mut metadata = Map::new();
		metadata.set("Author", "someone");
		let schematic = Schematic::builder()
			.size(2, 2, 1)
			.metadata(metadata.clone())
			.build_from(|pos| match pos.y {
				0 => blockstate!(wool[data=14]),
				_ => BlockState::from("legacy:4000"),
			})
			.unwrap();
		let map = encode(&schematic).unwrap();
		assert_eq!(map.get_byte_array("Blocks").unwrap(), Some(&[35u8, 35, 0xA0, 0xA0][..]));
		assert_eq!(map.get_byte_array("Data").unwrap(), Some(&[14u8, 14, 0, 0][..]));
		assert_eq!(map.get_byte_array("AddBlocks").unwrap(), Some(&[0x00u8, 0xFF][..]));
		let decoded = decode(&map).unwrap();
		assert_eq!(decoded.palette(), &Palette::Global);
		assert_eq!(decoded.metadata(), Some(&metadata));
		assert_eq!(decoded.get_block(Coord3::new(1, 0, 0)).unwrap(), blockstate!(wool[data=14]));
		assert_eq!(decoded.get_block(Coord3::new(0, 1, 0)).unwrap(), BlockState::from("legacy:4000"));

		let modded = Schematic::builder().build_from(|_| blockstate!(create:shaft)).unwrap();
		assert!(matches!(encode(&modded), Err(McError::UnsupportedValue(_))));
	}

	fn alpha(materials: &str) -> Map {
		let mut map = Map::new();
		map.set("Materials", materials);
		map.set("Width", 2i16);
		map.set("Height", 1i16);
		map.set("Length", 1i16);
		map.set_byte_array("Blocks", &[1, 2]);
		map.set_byte_array("Data", &[0, 0x35]);
		map
	}

	#[test]
	fn materials_detection() {
		let schematic = decode(&alpha("alpha")).unwrap();
		// The high bits of Data are ignored.
		assert_eq!(schematic.grid().ids().collect::<Vec<_>>(), vec![1 << 4, (2 << 4) | 5]);
		assert_eq!(schematic.offset(), Coord3::ZERO);
		assert!(matches!(
			decode(&alpha("Pocket")),
			Err(McError::UnknownFormat(materials)) if materials == "Pocket"
		));
		// Sponge materials go to the Sponge decoder, which needs a version.
		assert!(matches!(decode(&alpha("SPONGE")), Err(McError::NotFoundInCompound(_))));
	}

	#[test]
	fn sponge_delegation() {
		let schematic = Schematic::builder()
			.size(3, 1, 1)
			.build_from(|pos| if pos.x == 1 { blockstate!(create:shaft[axis=x]) } else { blockstate!(air) })
			.unwrap();
		let mut map = sponge::encode(&schematic).unwrap();
		assert_eq!(decode(&map).unwrap(), sponge::decode(&map).unwrap());
		map.set("Materials", "Sponge");
		let decoded = decode(&map).unwrap();
		assert_eq!(decoded.get_block(Coord3::new(1, 0, 0)).unwrap(), blockstate!(create:shaft[axis=x]));
	}

	#[test]
	fn short_arrays() {
		let mut map = alpha("Alpha");
		map.set_byte_array("Data", &[0]);
		assert!(matches!(
			decode(&map),
			Err(McError::InvalidArrayLength { field: "Data", expected: 2, found: 1 })
		));
		let mut map = alpha("Alpha");
		map.set_byte_array("AddBlocks", &[]);
		assert!(matches!(
			decode(&map),
			Err(McError::InvalidArrayLength { field: "AddBlocks", expected: 1, found: 0 })
		));
		// Checked before the grid is allocated.
		let mut map = alpha("Alpha");
		map.set("Width", -1i16);
		map.set("Height", -1i16);
		map.set("Length", -1i16);
		assert!(matches!(
			decode(&map),
			Err(McError::InvalidArrayLength { field: "Blocks", found: 2, .. })
		));
		let mut map = alpha("Alpha");
		map.set("Width", 70000i32);
		assert!(matches!(decode(&map), Err(McError::SizeExceeded { axis: "width", .. })));
	}
}

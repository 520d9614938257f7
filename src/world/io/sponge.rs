//! The Sponge schematic format (version 1).
//!
//! Blocks are stored as a palette (block state string to ID) and a stream of
//! VarInt IDs in grid index order. A schematic without a `Palette` uses the
//! global legacy numbering.

use crate::{
	McError,
	McResult,
	math::coord::Coord3,
	nbt::{
		DataView,
		DataViewMut,
		Map,
		Tag,
		TagID,
	},
	world::{
		blockstate::BlockState,
		palette::*,
		schematic::Schematic,
		voxelgrid::{StorageWidth, VoxelGrid},
	},
};

use super::{
	read_dimensions,
	varint,
	write_dimensions,
};

/// The only version that is read or written.
pub const VERSION: i32 = 1;
/// `Materials` value that marks a Sponge schematic.
pub const MATERIALS: &str = "Sponge";

fn read_offset<V: DataView>(view: &V) -> McResult<Coord3> {
	match view_field!(view; "Offset" => Option<get_int_array>) {
		None => Ok(Coord3::ZERO),
		Some(offset) => Coord3::from_slice(offset).ok_or(McError::InvalidField {
			field: "Offset".to_owned(),
			expected: TagID::IntArray,
		}),
	}
}

fn read_palette_max<V: DataView>(view: &V) -> McResult<u32> {
	match view_field!(view; "PaletteMax" => Option<get_int>) {
		None => Ok(PALETTE_MAX_SENTINEL),
		Some(max) => u32::try_from(max).map_err(|_| McError::UnsupportedValue(format!("PaletteMax {max}"))),
	}
}

/// Loads the local palette table. Every key is a block state string and
/// every value is the Int ID assigned to it.
fn read_palette(entries: &Map, palette_max: u32) -> McResult<LocalPalette> {
	let mut palette = if palette_max == PALETTE_MAX_SENTINEL {
		LocalPalette::new(palette_max)
	} else {
		LocalPalette::with_capacity(palette_max, entries.len())
	};
	for (key, tag) in entries.iter() {
		let Tag::Int(id) = tag else {
			return Err(McError::InvalidField {
				field: key.to_owned(),
				expected: TagID::Int,
			});
		};
		let id = u32::try_from(*id).map_err(|_| McError::UnsupportedValue(format!("{key} => {id}")))?;
		palette.assign(BlockState::parse(key)?, id)?;
	}
	Ok(palette)
}

/// Decodes a Sponge schematic.
pub fn decode<V: DataView>(view: &V) -> McResult<Schematic> {
	let version = view_field!(view; "Version" => get_int);
	if version != VERSION {
		log::warn!("Rejecting Sponge schematic with version {version}.");
		return Err(McError::UnsupportedVersion {
			found: version,
			expected: VERSION,
		});
	}
	let (width, height, length) = read_dimensions(view)?;
	let offset = read_offset(view)?;
	let palette_max = read_palette_max(view)?;
	let palette = match view_field!(view; "Palette" => Option<get_view>) {
		Some(entries) => Palette::Local(read_palette(entries, palette_max)?),
		None => Palette::Global,
	};
	let data = view_field!(view; "BlockData" => get_byte_array);
	// Every block takes at least one byte.
	let volume = width as usize * height as usize * length as usize;
	if data.len() < volume {
		return Err(McError::CorruptStream {
			offset: data.len(),
			reason: "stream is shorter than the number of blocks",
		});
	}
	let storage = match palette {
		// Global IDs go up to 0xFFFF no matter what PaletteMax says.
		Palette::Global => StorageWidth::for_palette_max(palette_max).max(StorageWidth::Short),
		Palette::Local(_) => StorageWidth::for_palette_max(palette_max),
	};
	let mut grid = VoxelGrid::new(width, height, length, -offset, storage)?;
	let mut cursor = 0;
	for index in 0..grid.volume() {
		let (id, next) = varint::decode(data, cursor)?;
		if !palette.contains_id(id) {
			return Err(McError::UnknownId(id));
		}
		let (x, y, z) = grid.position(index);
		grid.set_block(Coord3::new(x as i32, y as i32, z as i32) - offset, id)?;
		cursor = next;
	}
	if cursor != data.len() {
		return Err(McError::CorruptStream {
			offset: cursor,
			reason: "unexpected data after the last block",
		});
	}
	let metadata = view_field!(view; "Metadata" => Option<get_view>).cloned();
	log::debug!(
		"Decoded Sponge schematic {width}x{height}x{length} at offset {offset} with {:?} palette of {} entries.",
		palette.palette_type(),
		palette.size(),
	);
	Ok(Schematic::new(grid, palette, metadata))
}

/// Encodes a schematic into an existing view.
pub fn encode_into<V: DataViewMut>(schematic: &Schematic, view: &mut V) -> McResult<()> {
	let grid = schematic.grid();
	let palette = schematic.palette();
	let mut data = Vec::with_capacity(grid.volume());
	for id in grid.ids() {
		if !palette.contains_id(id) {
			return Err(McError::UnknownId(id));
		}
		varint::encode(id, &mut data);
	}
	view.set("Version", VERSION);
	write_dimensions(view, grid);
	view.set("Offset", schematic.offset().to_array().to_vec());
	view.set("PaletteMax", palette.palette_max() as i32);
	if let Palette::Local(local) = palette {
		let mut entries = Map::with_capacity(local.len());
		for (id, state) in local.entries() {
			let key = state.to_string();
			// The key has to read back as the same state.
			if BlockState::parse(&key).ok().as_ref() != Some(state) {
				return Err(McError::UnsupportedValue(key));
			}
			entries.insert(key, Tag::Int(id as i32));
		}
		view.set("Palette", entries);
	}
	view.set_byte_array("BlockData", &data);
	if let Some(metadata) = schematic.metadata() {
		view.set("Metadata", metadata.clone());
	}
	let (width, height, length) = grid.size();
	log::debug!(
		"Encoded Sponge schematic {width}x{height}x{length} with {:?} palette ({} bytes of block data).",
		palette.palette_type(),
		data.len(),
	);
	Ok(())
}

/// Encodes a schematic into a new compound.
pub fn encode(schematic: &Schematic) -> McResult<Map> {
	let mut map = Map::new();
	encode_into(schematic, &mut map)?;
	Ok(map)
}

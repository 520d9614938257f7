use std::collections::HashMap;

use super::blockstate::*;
use super::legacyid::{legacy_id, legacy_name};
use super::voxelgrid::StorageWidth;
use crate::{McError, McResult};

/// `PaletteMax` value meaning "no explicit maximum".
pub const PALETTE_MAX_SENTINEL: u32 = 0xFFFF;
/// Initial allocation for a local palette when no maximum is given.
pub const LOCAL_DEFAULT_CAPACITY: usize = 64;
/// Namespace of legacy block IDs that have no vanilla name.
pub const LEGACY_NAMESPACE: &str = "legacy";
/// Property holding the 4-bit legacy data value.
pub const DATA_PROPERTY: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteType {
	Global,
	Local,
}

/// The fixed legacy numbering: `(block_id << 4) | data`, where `block_id` has
/// 12 bits and `data` has 4.
///
/// Block IDs with a vanilla name map to `minecraft:<name>`, the rest map to
/// `legacy:<block_id>`. A non-zero data value becomes the `data` property.
/// Nothing is registered at runtime, so this is safe to share between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlobalPalette;

pub const GLOBAL_PALETTE: GlobalPalette = GlobalPalette;

/// Parses a number, rejecting anything that wouldn't be written back the same way.
fn parse_canonical<T: std::str::FromStr + ToString>(text: &str) -> Option<T> {
	text.parse::<T>().ok().filter(|value| value.to_string() == text)
}

impl GlobalPalette {
	/// Number of IDs in the global numbering.
	pub const SIZE: u32 = 0x10000;
	pub const MAX_BLOCK_ID: u16 = 0xFFF;

	pub fn id_for(&self, state: &BlockState) -> McResult<u32> {
		let unsupported = || McError::UnsupportedValue(state.to_string());
		let (namespace, path) = state.name().split_once(':').ok_or_else(unsupported)?;
		let block_id = match namespace {
			DEFAULT_NAMESPACE => legacy_id(path),
			LEGACY_NAMESPACE => parse_canonical::<u16>(path)
				.filter(|&id| id <= Self::MAX_BLOCK_ID && legacy_name(id).is_none()),
			_ => None,
		}.ok_or_else(unsupported)?;
		let data = match state.properties() {
			None => 0,
			Some([prop]) if prop.name() == DATA_PROPERTY => parse_canonical::<u8>(prop.value())
				.filter(|data| (1..=15).contains(data))
				.ok_or_else(unsupported)?,
			Some(_) => return Err(unsupported()),
		};
		Ok(((block_id as u32) << 4) | data as u32)
	}

	pub fn value_for(&self, id: u32) -> McResult<BlockState> {
		if id >= Self::SIZE {
			return Err(McError::UnknownId(id));
		}
		let block_id = (id >> 4) as u16;
		let data = id & 0xF;
		let name = match legacy_name(block_id) {
			Some(name) => format!("{DEFAULT_NAMESPACE}:{name}"),
			None => format!("{LEGACY_NAMESPACE}:{block_id}"),
		};
		let properties = if data == 0 {
			BlockProperties::none()
		} else {
			BlockProperties::from([(DATA_PROPERTY, data.to_string())])
		};
		Ok(BlockState::new(name, properties))
	}
}

/*
A LocalPalette holds only the states used by one structure.
States are assigned IDs either from an explicit table (when decoding)
or on first use (when building). Entries are never removed.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPalette {
	ids: HashMap<BlockState, u32>,
	states: HashMap<u32, BlockState>,
	max_size: u32,
	next_id: u32,
}

impl LocalPalette {
	pub fn new(max_size: u32) -> Self {
		Self::with_capacity(max_size, LOCAL_DEFAULT_CAPACITY)
	}

	pub fn with_capacity(max_size: u32, capacity: usize) -> Self {
		Self {
			ids: HashMap::with_capacity(capacity),
			states: HashMap::with_capacity(capacity),
			max_size,
			next_id: 0,
		}
	}

	pub fn max_size(&self) -> u32 {
		self.max_size
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// One past the highest assigned ID.
	pub fn id_bound(&self) -> u32 {
		self.next_id
	}

	pub fn get_id(&self, state: &BlockState) -> Option<u32> {
		self.ids.get(state).copied()
	}

	/// Returns the ID of a state, registering it with the next unused ID
	/// if it isn't in the palette yet.
	pub fn id_for(&mut self, state: &BlockState) -> McResult<u32> {
		if let Some(id) = self.get_id(state) {
			return Ok(id);
		}
		let id = self.next_id;
		self.assign(state.clone(), id)?;
		Ok(id)
	}

	/// Registers a state under a specific ID.
	/// Every entry goes through here, so this is where the mapping is kept one-to-one.
	pub fn assign(&mut self, state: BlockState, id: u32) -> McResult<()> {
		if id >= self.max_size {
			return Err(McError::CapacityExceeded { max: self.max_size });
		}
		match (self.ids.get(&state), self.states.get(&id)) {
			(Some(&existing), _) if existing == id => return Ok(()),
			(None, None) => (),
			_ => return Err(McError::PaletteConflict {
				id,
				state: state.to_string(),
			}),
		}
		log::trace!("Palette entry {id} => {state}");
		self.ids.insert(state.clone(), id);
		self.states.insert(id, state);
		self.next_id = self.next_id.max(id + 1);
		Ok(())
	}

	pub fn value_for(&self, id: u32) -> McResult<&BlockState> {
		self.states.get(&id).ok_or(McError::UnknownId(id))
	}

	pub fn contains_id(&self, id: u32) -> bool {
		self.states.contains_key(&id)
	}

	/// Entries in ascending ID order.
	pub fn entries(&self) -> Vec<(u32, &BlockState)> {
		let mut entries = self.states.iter()
			.map(|(id, state)| (*id, state))
			.collect::<Vec<_>>();
		entries.sort_by_key(|(id, _)| *id);
		entries
	}
}

impl Default for LocalPalette {
	fn default() -> Self {
		Self::new(PALETTE_MAX_SENTINEL)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Palette {
	Global,
	Local(LocalPalette),
}

impl Palette {
	pub fn local() -> Self {
		Palette::Local(LocalPalette::default())
	}

	pub fn from_type(palette_type: PaletteType) -> Self {
		match palette_type {
			PaletteType::Global => Palette::Global,
			PaletteType::Local => Palette::local(),
		}
	}

	pub fn palette_type(&self) -> PaletteType {
		match self {
			Palette::Global => PaletteType::Global,
			Palette::Local(_) => PaletteType::Local,
		}
	}

	/// See [LocalPalette::id_for]. The global palette never registers anything.
	pub fn id_for(&mut self, state: &BlockState) -> McResult<u32> {
		match self {
			Palette::Global => GLOBAL_PALETTE.id_for(state),
			Palette::Local(palette) => palette.id_for(state),
		}
	}

	pub fn get_id(&self, state: &BlockState) -> Option<u32> {
		match self {
			Palette::Global => GLOBAL_PALETTE.id_for(state).ok(),
			Palette::Local(palette) => palette.get_id(state),
		}
	}

	pub fn value_for(&self, id: u32) -> McResult<BlockState> {
		match self {
			Palette::Global => GLOBAL_PALETTE.value_for(id),
			Palette::Local(palette) => palette.value_for(id).cloned(),
		}
	}

	/// Whether `id` resolves to a value.
	pub fn contains_id(&self, id: u32) -> bool {
		match self {
			Palette::Global => id < GlobalPalette::SIZE,
			Palette::Local(palette) => palette.contains_id(id),
		}
	}

	/// Number of assigned entries.
	pub fn size(&self) -> u32 {
		match self {
			Palette::Global => GlobalPalette::SIZE,
			Palette::Local(palette) => palette.len() as u32,
		}
	}

	/// The `PaletteMax` value for this palette.
	pub fn palette_max(&self) -> u32 {
		match self {
			Palette::Global => PALETTE_MAX_SENTINEL,
			Palette::Local(palette) => palette.id_bound(),
		}
	}

	/// Cell width needed by a grid holding IDs from this palette.
	pub fn storage_width(&self) -> StorageWidth {
		StorageWidth::for_palette_max(self.palette_max())
	}
}

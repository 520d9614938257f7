//! Reading and writing `.schematic` files: a gzip compressed NBT compound
//! named `Schematic`.

use std::{
	fs::File,
	io::{
		BufReader,
		BufWriter,
		Read,
		Write,
	},
	path::Path,
};

use crate::{
	McError,
	McResult,
	ioext::{
		read_compressed,
		write_compressed,
	},
	nbt::{
		DataView,
		Map,
		NamedTag,
		Tag,
		TagID,
	},
	world::schematic::Schematic,
};

use super::{legacy, sponge};

/// Name of the root tag.
pub const ROOT_NAME: &str = "Schematic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchematicFormat {
	Sponge,
	Legacy,
}

impl SchematicFormat {
	/// Decodes a schematic. [SchematicFormat::Legacy] also accepts Sponge
	/// schematics, choosing the decoder from the `Materials` field.
	pub fn decode<V: DataView>(self, view: &V) -> McResult<Schematic> {
		match self {
			SchematicFormat::Sponge => sponge::decode(view),
			SchematicFormat::Legacy => legacy::decode(view),
		}
	}

	pub fn encode(self, schematic: &Schematic) -> McResult<Map> {
		match self {
			SchematicFormat::Sponge => sponge::encode(schematic),
			SchematicFormat::Legacy => legacy::encode(schematic),
		}
	}
}

/// Reads a schematic in either format.
pub fn read_schematic<R: Read>(reader: R) -> McResult<Schematic> {
	let root: NamedTag = read_compressed(reader)?;
	if root.name != ROOT_NAME {
		log::debug!("Schematic root tag is named {:?}.", root.name);
	}
	match &root.tag {
		Tag::Compound(map) => SchematicFormat::Legacy.decode(map),
		_ => Err(McError::InvalidField {
			field: root.name,
			expected: TagID::Compound,
		}),
	}
}

/// Writes a schematic and returns the number of uncompressed bytes written.
pub fn write_schematic<W: Write>(writer: W, schematic: &Schematic, format: SchematicFormat) -> McResult<usize> {
	let root = NamedTag::new(ROOT_NAME, format.encode(schematic)?);
	write_compressed(writer, &root)
}

pub fn load_schematic<P: AsRef<Path>>(path: P) -> McResult<Schematic> {
	let file = File::open(path)?;
	read_schematic(BufReader::new(file))
}

pub fn save_schematic<P: AsRef<Path>>(path: P, schematic: &Schematic, format: SchematicFormat) -> McResult<usize> {
	let file = File::create(path)?;
	let mut writer = BufWriter::new(file);
	let size = write_schematic(&mut writer, schematic, format)?;
	writer.flush()?;
	Ok(size)
}

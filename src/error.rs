use chumsky::error::Simple;
use thiserror::Error;

use crate::nbt::tag::TagID;
use crate::world::voxelgrid::StorageWidth;

/// The master error type.
#[derive(Debug, Error)]
pub enum McError {
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Failed to convert to UTF-8 string.")]
	FromUtf8Error(#[from] std::string::FromUtf8Error),
	#[error("Unsupported Tag ID: {0}")]
	UnsupportedTagId(u8),
	#[error("There was an error decoding the NBT Tag.")]
	NbtDecodeError,
	#[error("String is too long for NBT ({0} bytes).")]
	StringTooLong(usize),
	#[error("Tag was not found in Compound.\n\"{0}\"")]
	NotFoundInCompound(String),
	#[error("Tag \"{field}\" is not of the expected type ({expected:?}).")]
	InvalidField {
		field: String,
		expected: TagID,
	},
	#[error("Failed to parse block state \"{input}\".")]
	BlockStateParse {
		input: String,
		errors: Vec<Simple<char>>,
	},
	#[error("Schematic is larger than maximum allowable size ({axis} was {found}, max is {max}).")]
	SizeExceeded {
		axis: &'static str,
		found: u32,
		max: u32,
	},
	#[error("Schematic {axis} must be at least 1.")]
	InvalidDimension {
		axis: &'static str,
	},
	#[error("Unknown schematic version {found} (current version is {expected}).")]
	UnsupportedVersion {
		found: i32,
		expected: i32,
	},
	#[error("Schematic specifies unknown materials {0}.")]
	UnknownFormat(String),
	#[error("Corrupt block stream at byte {offset}: {reason}.")]
	CorruptStream {
		offset: usize,
		reason: &'static str,
	},
	#[error("Coordinate ({x}, {y}, {z}) is outside of the volume.")]
	OutOfBounds {
		x: i64,
		y: i64,
		z: i64,
	},
	#[error("Palette is full (maximum size is {max}).")]
	CapacityExceeded {
		max: u32,
	},
	#[error("Palette has no entry with ID {0}.")]
	UnknownId(u32),
	#[error("Value can not be represented by the palette: {0}")]
	UnsupportedValue(String),
	#[error("ID {id} does not fit in {width:?} storage.")]
	StorageOverflow {
		id: u32,
		width: StorageWidth,
	},
	#[error("Palette entry {state} => {id} conflicts with an existing entry.")]
	PaletteConflict {
		id: u32,
		state: String,
	},
	#[error("Array \"{field}\" has {found} elements, expected at least {expected}.")]
	InvalidArrayLength {
		field: &'static str,
		expected: usize,
		found: usize,
	},
}

pub type McResult<T> = Result<T,McError>;

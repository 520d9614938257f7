//! Schematic codecs.

use crate::{
	McError,
	McResult,
	nbt::{
		DataView,
		DataViewMut,
		Tag,
		TagID,
	},
	world::voxelgrid::VoxelGrid,
};

/// Reads a field through a [DataView], failing with
/// [McError::NotFoundInCompound] when a required field is missing.
/// ```ignore
/// let version: i32 = view_field!(view; "Version" => get_int);
/// let offset: Option<&[i32]> = view_field!(view; "Offset" => Option<get_int_array>);
/// ```
macro_rules! view_field {
	($view:expr; $name:literal => Option<$getter:ident>) => {
		$view.$getter($name)?
	};
	($view:expr; $name:literal => $getter:ident) => {
		$view.$getter($name)?.ok_or_else(|| $crate::McError::NotFoundInCompound($name.to_owned()))?
	};
}

pub mod varint;
pub mod sponge;
pub mod legacy;
pub mod schematicfile;

/// Dimensions are Shorts that are read as unsigned. Ints are accepted so
/// that oversized files report their real size.
fn read_dimension<V: DataView>(view: &V, field: &'static str) -> McResult<u32> {
	match view.get_tag(field) {
		Some(Tag::Short(value)) => Ok(*value as u16 as u32),
		Some(Tag::Int(value)) => Ok(*value as u32),
		Some(_) => Err(McError::InvalidField {
			field: field.to_owned(),
			expected: TagID::Short,
		}),
		None => Err(McError::NotFoundInCompound(field.to_owned())),
	}
}

/// Reads `Width`, `Height` and `Length`, verifying them before anything is allocated.
pub(crate) fn read_dimensions<V: DataView>(view: &V) -> McResult<(u32, u32, u32)> {
	let (width, height, length) = VoxelGrid::check_size(
		read_dimension(view, "Width")?,
		read_dimension(view, "Height")?,
		read_dimension(view, "Length")?,
	)?;
	Ok((width as u32, height as u32, length as u32))
}

pub(crate) fn write_dimensions<V: DataViewMut>(view: &mut V, grid: &VoxelGrid) {
	view.set("Width", grid.width() as u16 as i16);
	view.set("Height", grid.height() as u16 as i16);
	view.set("Length", grid.length() as u16 as i16);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::nbt::Map;

	#[test]
	fn unsigned_dimensions() {
		let mut map = Map::new();
		map.set("Width", -1i16);
		map.set("Height", 1i16);
		map.set("Length", 300i32);
		assert_eq!(read_dimensions(&map).unwrap(), (65535, 1, 300));
		map.set("Height", 70000i32);
		assert!(matches!(
			read_dimensions(&map),
			Err(McError::SizeExceeded { axis: "height", found: 70000, .. })
		));
		map.remove("Height");
		assert!(matches!(read_dimensions(&map), Err(McError::NotFoundInCompound(_))));
		map.set("Height", "tall");
		assert!(matches!(read_dimensions(&map), Err(McError::InvalidField { .. })));
	}
}

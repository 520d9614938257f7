//! A minimal NBT implementation. Schematics are stored as NBT compounds, so
//! this is the document model that the schematic codecs read and write.

pub mod tag;
pub mod tagtype;
pub mod io;
pub mod dataview;
pub mod macros;

pub use tag::{Tag, ListTag, TagID, NamedTag};
pub use dataview::{DataView, DataViewMut};

#[cfg(not(feature = "preserve_order"))]
pub type MapType<T> = std::collections::HashMap<String, T>;
#[cfg(feature = "preserve_order")]
pub type MapType<T> = indexmap::IndexMap<String, T>;

/// The payload of a Compound tag.
pub type Map = MapType<Tag>;

/// Shorthand way to create a Tag::Compound.
/// Example:
/// ```no_run
/// # use mcschem::compound;
/// compound!{
///     ("Item One", 0i8),
///     (String::from("Item Two"), 2i32),
///     ("Item Three", "Three")
/// };
/// ```
#[macro_export]
macro_rules! compound {
    ($(($name:expr, $value:expr)),+$(,)?) => {
        $crate::nbt::tag::Tag::Compound($crate::nbt::Map::from([
            $(
                (::std::string::String::from($name), $crate::nbt::tag::Tag::from($value)),
            )+
        ]))
    };
    () => {
        $crate::nbt::tag::Tag::Compound($crate::nbt::Map::new())
    };
}

#[cfg(test)]
mod tests {
    use crate::nbt::tag::Tag;

    #[test]
    fn compound_test() {
        let tag = compound! {
            ("Materials", "Alpha"),
            (String::from("Width"), 4i16),
        };
        let Tag::Compound(map) = tag else { panic!("Expected a Compound.") };
        assert_eq!(map.get("Materials"), Some(&Tag::String("Alpha".to_owned())));
        assert_eq!(map.get("Width"), Some(&Tag::Short(4)));
        assert_eq!(compound!(), Tag::Compound(crate::nbt::Map::new()));
    }
}

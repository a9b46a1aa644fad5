#[macro_export]
macro_rules! assert_empty {
    ($slice:expr) => {{
        match &$slice[..] {
            [] => {}
            actual => panic!("expected slice to be empty; actual={:?}", actual),
        }
    }};
}

#[macro_export]
macro_rules! assert_len {
    ($slice:expr, $len:expr) => {{
        let slice = &$slice[..];
        assert_eq!(
            slice.len(),
            $len,
            "unexpected length of `{}`; actual={:?}",
            stringify!($slice),
            slice,
        );
    }};
}

/// Unwraps an `Err`, panicking with the `Ok` value otherwise.
///
/// With a second argument naming a predicate method, the error must also
/// satisfy it: `assert_err!(repo.find_by_column("nick", 1), is_schema_mapping)`.
#[macro_export]
macro_rules! assert_err {
    ($e:expr) => {
        match $e {
            Err(e) => e,
            Ok(actual) => panic!("expected `Err`; actual=Ok({:?})", actual),
        }
    };
    ($e:expr, $pred:ident) => {
        match $e {
            Err(e) if e.$pred() => e,
            Err(e) => panic!(
                "expected `Err` satisfying `{}`; actual=Err({})",
                stringify!($pred),
                e
            ),
            Ok(actual) => panic!("expected `Err`; actual=Ok({:?})", actual),
        }
    };
}

/// Unwraps an `Ok`, panicking with the error's display otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(e) => panic!("expected `Ok`; actual=Err({})", e),
        }
    };
}

// Helper macro to distinguish between patterns and expressions
#[macro_export]
macro_rules! assert_case {
    // Guard patterns - patterns with if conditions
    ($result:expr, { $pattern:pat if $guard:expr }) => {
        match $result {
            $pattern if $guard => {},
            other => panic!("Expected {} if {} but got {:?}", stringify!($pattern), stringify!($guard), other),
        }
    };

    // Pattern matching cases - detect common pattern forms
    ($result:expr, { Ok($($pattern:tt)*) }) => {
        match $result {
            Ok($($pattern)*) => {},
            other => panic!("Expected Ok({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    ($result:expr, { Err($($pattern:tt)*) }) => {
        match $result {
            Err($($pattern)*) => {},
            other => panic!("Expected Err({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    ($result:expr, { Some($($pattern:tt)*) }) => {
        match $result {
            Some($($pattern)*) => {},
            other => panic!("Expected Some({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    ($result:expr, { None }) => {
        match $result {
            None => {},
            other => panic!("Expected None but got {:#?}", other),
        }
    };

    // Wildcard pattern
    ($result:expr, { _ }) => {
        // Always passes - just to ensure the expression compiles
        let _ = $result;
    };

    // Default case - treat as expression for equality comparison
    ($result:expr, { $expected:expr }) => {
        match $result {
            Ok(actual) => {
                pretty_assertions::assert_eq!($expected, actual, "Expected {:#?} but got {:#?}\n\n< expected / got >", $expected, actual);
            },
            other => panic!("Expected Ok(...) but got {:?}", other),
        }
    };
}

// Helper macro to generate test functions based on field names
#[macro_export]
macro_rules! handle_case {
    // With attributes (including empty attribute list)
    ([$($attrs:meta)*] shape, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_shape() {
            let arena = bumpalo::Bump::new();
            let mut host = datumbridge::ArenaHost::new(&arena);
            let (oid, datum) = input(&mut host);
            let result = datumbridge::shape_of(&host, oid, datum);
            assert_case!(result, $expected);
        }
    };

    ([$($attrs:meta)*] read_only, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_read_only() {
            let arena = bumpalo::Bump::new();
            let mut host = datumbridge::ArenaHost::new(&arena);
            let (oid, datum) = input(&mut host);
            let result = describe(datumbridge::convert(&host, false, oid, datum));
            assert_case!(result.as_deref(), $expected);
        }
    };

    ([$($attrs:meta)*] writable, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_writable() {
            let arena = bumpalo::Bump::new();
            let mut host = datumbridge::ArenaHost::new(&arena);
            let (oid, datum) = input(&mut host);
            let result = describe(datumbridge::convert(&host, true, oid, datum));
            assert_case!(result.as_deref(), $expected);
        }
    };

    ([$($attrs:meta)*] scalar, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_scalar() {
            let arena = bumpalo::Bump::new();
            let mut host = datumbridge::ArenaHost::new(&arena);
            let (oid, datum) = input(&mut host);
            let result = datumbridge::convert(&host, false, oid, datum)
                .map(|value| value.and_then(|value| value.as_scalar().copied()));
            assert_case!(result, $expected);
        }
    };

    ([$($attrs:meta)*] error, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_error() {
            // Normalize by stripping trailing whitespace from each line
            fn normalize(s: &str) -> String {
                s.lines()
                    .map(|line| line.trim_end())
                    .collect::<Vec<_>>()
                    .join("\n")
                    + "\n"
            }

            let arena = bumpalo::Bump::new();
            let mut host = datumbridge::ArenaHost::new(&arena);
            let (oid, datum) = input(&mut host);
            let err = match datumbridge::convert(&host, false, oid, datum) {
                Err(e) => e,
                Ok(value) => panic!("Expected conversion error, but got {value:?}"),
            };
            let mut buf = Vec::new();
            let config = datumbridge::RenderConfig {
                color: false,
                charset: datumbridge::CharSet::Ascii,
                width: 200,
            };
            datumbridge::render_error_to(&err, &mut buf, &config).unwrap();
            let err_string = String::from_utf8_lossy(&buf).into_owned();
            let normalized = normalize(&err_string);

            let result: Result<&str, ()> = Ok(normalized.as_str());
            assert_case!(result, $expected);
        }
    };

    // Generic case for unknown field names
    ([$($attrs:meta)*] $field_name:ident, $expected:tt) => {
        compile_error!(concat!("Unknown test case field: ", stringify!($field_name)));
    };
}

// Helper macro to recursively parse assertion fields (now correctly capturing braces)
#[macro_export]
macro_rules! parse_assertions {
    // Base case: no more fields to parse
    (@parse [$($test_functions:tt)*]) => {
        $($test_functions)*
    };

    // Parse assertion field with potential attributes (handles both cases)
    (@parse [$($test_functions:tt)*] $(#[$attr:meta])* $field_name:ident: $field_value:tt, $($rest:tt)*) => {
        parse_assertions! {@parse [
            $($test_functions)*
            handle_case! {[$($attr)*] $field_name, $field_value}
        ] $($rest)*}
    };
}

// Main macro - name first, input second, then any order for assertions.
//
// `input` builds the value under test inside a fresh `ArenaHost` and
// returns its type identifier and datum.
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: |$host:ident| $input:block,
        $($assertion_fields:tt)*
    ) => {
        mod $name {
            #![allow(unused_imports, unused_variables, dead_code)]

            use super::*;
            use datumbridge::{ArenaHost, ConversionError, Datum, Oid, Result, Value};

            fn input($host: &mut ArenaHost<'_>) -> (Oid, Datum) $input

            // Describe a conversion the way the host would print its type,
            // with "none" for values that have no native representation.
            fn describe(result: Result<Option<Value<'_>>>) -> Result<String> {
                result.map(|value| value.map_or_else(|| "none".to_string(), |value| value.describe()))
            }

            // Generate all test functions
            parse_assertions! {@parse [] $($assertion_fields)*}
        }
    };
}

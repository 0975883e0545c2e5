//! Macro for implementing Display and FromStr for wire enums
//!
//! Several API values travel as short lowercase keys (`search`, `display`,
//! `quickstart`). This macro maps enum variants to those keys in one place.
//! Parsing is case-insensitive; an unknown key is a caller error.
//!
//! # Example
//!
//! ```rust
//! use sitewit_domain::impl_wire_key_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Search,
//!     Display,
//! }
//!
//! impl_wire_key_conversions!(Channel {
//!     Search => "search",
//!     Display => "display",
//! });
//!
//! assert_eq!("SEARCH".parse::<Channel>().unwrap(), Channel::Search);
//! ```

/// Implements Display and FromStr for enums keyed by lowercase strings
///
/// `FromStr` fails with [`SiteWitError::InvalidArgument`](crate::SiteWitError)
/// so unknown keys surface as local caller errors.
#[macro_export]
macro_rules! impl_wire_key_conversions {
    ($enum_name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire key for this variant
            pub const fn key(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.key())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::SiteWitError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($key => Ok(Self::$variant),)+
                    _ => Err($crate::SiteWitError::InvalidArgument(format!(
                        "unknown {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::SiteWitError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestKind {
        Alpha,
        Beta,
    }

    impl_wire_key_conversions!(TestKind {
        Alpha => "alpha",
        Beta => "beta",
    });

    mod with_result_alias {
        #[allow(unused_imports)]
        use crate::errors::Result;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Scoped {
            One,
        }

        impl_wire_key_conversions!(Scoped {
            One => "one",
        });
    }

    #[test]
    fn test_expands_where_result_alias_is_imported() {
        use with_result_alias::Scoped;

        assert_eq!(Scoped::from_str("ONE").unwrap(), Scoped::One);
        assert!(Scoped::from_str("two").is_err());
    }

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestKind::Alpha.to_string(), "alpha");
        assert_eq!(TestKind::Beta.key(), "beta");
    }

    #[test]
    fn test_fromstr_mixed_case() {
        assert_eq!(TestKind::from_str("ALPHA").unwrap(), TestKind::Alpha);
        assert_eq!(TestKind::from_str("BeTa").unwrap(), TestKind::Beta);
    }

    #[test]
    fn test_fromstr_unknown_is_invalid_argument() {
        let err = TestKind::from_str("gamma").unwrap_err();
        assert!(matches!(err, SiteWitError::InvalidArgument(ref msg) if msg.contains("TestKind")));
    }
}

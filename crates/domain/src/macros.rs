//! Macro for implementing conversions on integer-coded choice enums
//!
//! Choice enums are stored as small integers and shown to editors by name.
//! This macro generates both directions for both representations.
//!
//! # Example
//!
//! ```rust
//! use wiss_domain::impl_choice_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Visibility {
//!     Draft,
//!     Live,
//! }
//!
//! impl_choice_conversions!(Visibility {
//!     Draft => ("draft", 0),
//!     Live => ("live", 1),
//! });
//!
//! assert_eq!(Visibility::Live.code(), 1);
//! assert_eq!(Visibility::from_code(0), Some(Visibility::Draft));
//! assert_eq!("LIVE".parse::<Visibility>(), Ok(Visibility::Live));
//! ```

/// Implements `Display`, `FromStr`, `code()` and `from_code()` for a choice
/// enum.
///
/// - `Display` writes the lowercase name
/// - `FromStr` parses names case-insensitively
/// - `code()`/`from_code()` map to and from the stored integer
#[macro_export]
macro_rules! impl_choice_conversions {
    ($enum_name:ident { $($variant:ident => ($str:expr, $code:expr)),+ $(,)? }) => {
        impl $enum_name {
            /// Integer code used in storage.
            pub const fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Look up a variant by its stored integer code.
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $(c if c == $code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

//! Macro for implementing Display and FromStr for keyword enums
//!
//! Several small enums (clone stages, duplication modes, log formats) travel
//! as lowercase keywords through CLI flags, JSON bodies and log fields. This
//! macro gives them one consistent string form.
//!
//! # Example
//!
//! ```rust
//! use eventforge_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Delivery {
//!     Email,
//!     Sms,
//! }
//!
//! impl_domain_status_conversions!(Delivery {
//!     Email => "email",
//!     Sms => "sms",
//! });
//!
//! assert_eq!(Delivery::Sms.to_string(), "sms");
//! assert_eq!("EMAIL".parse::<Delivery>().unwrap(), Delivery::Email);
//! ```

/// Implements Display and FromStr traits for keyword enums
///
/// - Display writes the keyword
/// - FromStr matches keywords case-insensitively, ignoring surrounding
///   whitespace, and names the enum in its error message
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

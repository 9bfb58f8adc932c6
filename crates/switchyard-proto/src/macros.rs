//! Helpers for integer-tagged wire enums.

/// Declare a fieldless enum that travels as a `u8` on the wire.
///
/// Generates `From<Enum> for u8`, `TryFrom<u8> for Enum` (rejecting unknown
/// values with [`crate::ProtoError::InvalidEnum`]) and serde impls that go
/// through those conversions.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = $crate::ProtoError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    other => Err($crate::ProtoError::InvalidEnum {
                        kind: stringify!($name),
                        value: other,
                    }),
                }
            }
        }
    };
}

use crate::value::Value;

///
/// ValueTag
///
/// Stable canonical value-variant tag used by diagnostics and column typing.
///
/// IMPORTANT:
/// Tag values are part of stable behavior and must remain fixed.
///
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueTag {
    Float = 1,
    Int = 2,
    Null = 3,
    Text = 4,
}

impl ValueTag {
    /// Stable byte tag for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::Int => "Int",
            Self::Null => "Null",
            Self::Text => "Text",
        }
    }
}

impl Value {
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        match self {
            Self::Float(_) => ValueTag::Float,
            Self::Int(_) => ValueTag::Int,
            Self::Null => ValueTag::Null,
            Self::Text(_) => ValueTag::Text,
        }
    }
}

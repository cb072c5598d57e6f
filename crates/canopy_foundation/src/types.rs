//! Value-member type descriptors and the pluggable type registry.
//!
//! The schema builder resolves declared type names ("word", "int", ...)
//! against a [`TypeRegistry`]. A front-end may register additional types,
//! for example one per user-declared enumeration, before building.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The persistence primitive a value member maps to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveKind {
    /// Character data.
    Text,
    /// Whole numbers.
    Integer,
    /// Fixed-point decimal numbers.
    Decimal,
    /// True / false.
    Boolean,
    /// Calendar date without time.
    Date,
    /// Date and time.
    DateTime,
    /// Auto-assigned monotonically increasing integer.
    ///
    /// Sequence members are excluded from create commands because the
    /// store assigns them during registration.
    Sequence,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Sequence => "sequence",
        };
        write!(f, "{text}")
    }
}

/// A value-member type descriptor.
///
/// Carries the persistence primitive plus the validation facets a renderer
/// needs to emit column definitions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueType {
    /// The registered name this type resolves from.
    pub name: String,
    /// The persistence primitive.
    pub primitive: PrimitiveKind,
    /// Maximum character length, for text types.
    pub max_length: Option<u32>,
    /// Total number of digits, for decimal types.
    pub total_digits: Option<u8>,
    /// Digits after the decimal point, for decimal types.
    pub decimal_places: Option<u8>,
}

impl ValueType {
    /// Creates a descriptor with no validation facets.
    #[must_use]
    pub fn new(name: impl Into<String>, primitive: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            primitive,
            max_length: None,
            total_digits: None,
            decimal_places: None,
        }
    }

    /// Sets the maximum character length facet.
    #[must_use]
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the numeric precision facets.
    #[must_use]
    pub fn with_precision(mut self, total_digits: u8, decimal_places: u8) -> Self {
        self.total_digits = Some(total_digits);
        self.decimal_places = Some(decimal_places);
        self
    }

    /// True if this type is auto-assigned at registration time.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.primitive == PrimitiveKind::Sequence
    }
}

/// Mapping from declared type names to [`ValueType`] descriptors.
///
/// `default()` pre-registers the built-in types; callers may register more
/// or shadow the built-ins before building a schema.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: HashMap<String, ValueType>,
}

impl TypeRegistry {
    /// Creates an empty registry with no built-ins.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Registers a type, shadowing any prior registration for the name.
    pub fn register(&mut self, value_type: ValueType) {
        self.types.insert(value_type.name.clone(), value_type);
    }

    /// Resolves a declared type name.
    #[must_use]
    pub fn try_resolve(&self, name: &str) -> Option<&ValueType> {
        self.types.get(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for value_type in [
            ValueType::new("word", PrimitiveKind::Text).with_max_length(64),
            ValueType::new("sentence", PrimitiveKind::Text).with_max_length(1024),
            ValueType::new("int", PrimitiveKind::Integer),
            ValueType::new("decimal", PrimitiveKind::Decimal).with_precision(18, 2),
            ValueType::new("bool", PrimitiveKind::Boolean),
            ValueType::new("date", PrimitiveKind::Date),
            ValueType::new("datetime", PrimitiveKind::DateTime),
            ValueType::new("year", PrimitiveKind::Integer),
            ValueType::new("yearmonth", PrimitiveKind::Integer),
            ValueType::new("sequence", PrimitiveKind::Sequence),
        ] {
            registry.register(value_type);
        }
        registry
    }
}

use std::fmt;

/// Declares [`Value`], [`ValueKind`] and the conversions between a value and
/// each supported element type from one list of `Variant(type) => "tag"`.
macro_rules! value_types {
    ($($variant:ident($ty:ty) => $tag:literal,)*) => {
        /// Erased cell value exchanged through the column façade and row bags.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Value {
            $($variant($ty),)*
            Null,
        }

        /// Enumerates the element type behind a [`Value`] or a column.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ValueKind {
            $($variant,)*
            Null,
        }

        impl Value {
            /// Returns the [`ValueKind`] describing the contained value.
            pub fn kind(&self) -> ValueKind {
                match self {
                    $(Value::$variant(_) => ValueKind::$variant,)*
                    Value::Null => ValueKind::Null,
                }
            }
        }

        impl ValueKind {
            /// Returns the Rust element type name used as a column's type tag.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(ValueKind::$variant => $tag,)*
                    ValueKind::Null => "null",
                }
            }
        }

        /// `Null` renders as `NaN`.
        impl fmt::Display for Value {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Value::$variant(v) => fmt::Display::fmt(v, f),)*
                    Value::Null => f.write_str("NaN"),
                }
            }
        }

        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Value;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

value_types! {
    Int(i32) => "i32",
    Long(i64) => "i64",
    UInt(u32) => "u32",
    ULong(u64) => "u64",
    Float(f32) => "f32",
    Double(f64) => "f64",
    Bool(bool) => "bool",
    Byte(u8) => "u8",
    Char(char) => "char",
    Str(String) => "String",
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for floating point NaN payloads.
    pub fn is_nan(&self) -> bool {
        match self {
            Value::Float(v) => v.is_nan(),
            Value::Double(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Interprets the value as a column position, if it holds a non-negative integer.
    pub fn as_position(&self) -> Option<usize> {
        match *self {
            Value::Int(v) => usize::try_from(v).ok(),
            Value::Long(v) => usize::try_from(v).ok(),
            Value::UInt(v) => usize::try_from(v).ok(),
            Value::ULong(v) => usize::try_from(v).ok(),
            Value::Byte(v) => Some(v as usize),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

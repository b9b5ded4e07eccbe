//! Constant expressions.
//!
//! The front end folds every constant expression before handing the tree
//! over, so an expression here is already a single tagged value.

use crate::node::NodeId;
use std::fmt;

/// A reduced constant expression value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    /// `short` value.
    Short(i16),
    /// `unsigned short` value.
    UnsignedShort(u16),
    /// `long` value.
    Long(i32),
    /// `unsigned long` value.
    UnsignedLong(u32),
    /// `long long` value.
    LongLong(i64),
    /// `unsigned long long` value.
    UnsignedLongLong(u64),
    /// `float` value.
    Float(f32),
    /// `double` value.
    Double(f64),
    /// `char` value.
    Char(char),
    /// `wchar` value.
    WChar(char),
    /// `octet` value.
    Octet(u8),
    /// `boolean` value.
    Boolean(bool),
    /// `string` value.
    String(String),
    /// `wstring` value.
    WString(String),
    /// Reference to an enumerator node.
    Enumerator(NodeId),
}

impl ExprValue {
    /// Returns the tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ExprKind {
        match self {
            Self::Short(_) => ExprKind::Short,
            Self::UnsignedShort(_) => ExprKind::UnsignedShort,
            Self::Long(_) => ExprKind::Long,
            Self::UnsignedLong(_) => ExprKind::UnsignedLong,
            Self::LongLong(_) => ExprKind::LongLong,
            Self::UnsignedLongLong(_) => ExprKind::UnsignedLongLong,
            Self::Float(_) => ExprKind::Float,
            Self::Double(_) => ExprKind::Double,
            Self::Char(_) => ExprKind::Char,
            Self::WChar(_) => ExprKind::WChar,
            Self::Octet(_) => ExprKind::Octet,
            Self::Boolean(_) => ExprKind::Boolean,
            Self::String(_) => ExprKind::String,
            Self::WString(_) => ExprKind::WString,
            Self::Enumerator(_) => ExprKind::Enumerator,
        }
    }
}

/// Tag of an [`ExprValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// `short`.
    Short,
    /// `unsigned short`.
    UnsignedShort,
    /// `long`.
    Long,
    /// `unsigned long`.
    UnsignedLong,
    /// `long long`.
    LongLong,
    /// `unsigned long long`.
    UnsignedLongLong,
    /// `float`.
    Float,
    /// `double`.
    Double,
    /// `char`.
    Char,
    /// `wchar`.
    WChar,
    /// `octet`.
    Octet,
    /// `boolean`.
    Boolean,
    /// `string`.
    String,
    /// `wstring`.
    WString,
    /// Enumerator reference.
    Enumerator,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::UnsignedShort => "unsigned short",
            Self::Long => "long",
            Self::UnsignedLong => "unsigned long",
            Self::LongLong => "long long",
            Self::UnsignedLongLong => "unsigned long long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::WChar => "wchar",
            Self::Octet => "octet",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::WString => "wstring",
            Self::Enumerator => "enumerator",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_kind() {
        assert_eq!(ExprValue::Short(-1).kind(), ExprKind::Short);
        assert_eq!(ExprValue::UnsignedLong(7).kind(), ExprKind::UnsignedLong);
        assert_eq!(
            ExprValue::String("x".to_string()).kind(),
            ExprKind::String
        );
        assert_eq!(
            ExprValue::Enumerator(NodeId::new(2)).kind(),
            ExprKind::Enumerator
        );
    }

    #[test]
    fn test_expr_kind_display() {
        assert_eq!(ExprKind::UnsignedShort.to_string(), "unsigned short");
        assert_eq!(ExprKind::Double.to_string(), "double");
    }
}

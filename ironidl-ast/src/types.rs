//! Predefined IDL types.
//!
//! Primitive types are the leaves of every type reference chain. They are
//! never emitted: the Ada runtime already declares them together with their
//! marshalling subprograms.

/// IDL primitive (predefined) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Long,
    /// Signed 64-bit integer.
    LongLong,
    /// Unsigned 16-bit integer.
    UnsignedShort,
    /// Unsigned 32-bit integer.
    UnsignedLong,
    /// Unsigned 64-bit integer.
    UnsignedLongLong,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Extended floating point.
    LongDouble,
    /// 8-bit character.
    Char,
    /// Wide character.
    WChar,
    /// Boolean.
    Boolean,
    /// Uninterpreted byte.
    Octet,
    /// Self-describing value.
    Any,
    /// Generic object reference.
    Object,
    /// Type description.
    TypeCode,
}

impl PrimitiveType {
    /// Returns the wire size in bytes, or `None` when the encoding is
    /// variable.
    #[must_use]
    pub const fn wire_size(&self) -> Option<usize> {
        match self {
            Self::Char | Self::Boolean | Self::Octet => Some(1),
            Self::Short | Self::UnsignedShort | Self::WChar => Some(2),
            Self::Long | Self::UnsignedLong | Self::Float => Some(4),
            Self::LongLong | Self::UnsignedLongLong | Self::Double => Some(8),
            Self::LongDouble => Some(16),
            Self::Any | Self::Object | Self::TypeCode => None,
        }
    }

    /// Returns true if values of this type always marshal to the same size.
    #[must_use]
    pub const fn is_fixed_size(&self) -> bool {
        self.wire_size().is_some()
    }

    /// Returns the Ada runtime type name for this primitive.
    #[must_use]
    pub const fn ada_type(&self) -> &'static str {
        match self {
            Self::Short => "Corba.Short",
            Self::Long => "Corba.Long",
            Self::LongLong => "Corba.Long_Long",
            Self::UnsignedShort => "Corba.Unsigned_Short",
            Self::UnsignedLong => "Corba.Unsigned_Long",
            Self::UnsignedLongLong => "Corba.Unsigned_Long_Long",
            Self::Float => "Corba.Float",
            Self::Double => "Corba.Double",
            Self::LongDouble => "Corba.Long_Double",
            Self::Char => "Corba.Char",
            Self::WChar => "Corba.Wchar",
            Self::Boolean => "Corba.Boolean",
            Self::Octet => "Corba.Octet",
            Self::Any => "Corba.Any",
            Self::Object => "Corba.Object.Ref",
            Self::TypeCode => "Corba.TypeCode.Object",
        }
    }

    /// Returns the IDL spelling.
    #[must_use]
    pub const fn idl_name(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::LongLong => "long long",
            Self::UnsignedShort => "unsigned short",
            Self::UnsignedLong => "unsigned long",
            Self::UnsignedLongLong => "unsigned long long",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
            Self::Char => "char",
            Self::WChar => "wchar",
            Self::Boolean => "boolean",
            Self::Octet => "octet",
            Self::Any => "any",
            Self::Object => "Object",
            Self::TypeCode => "TypeCode",
        }
    }

    /// Parses a primitive type from its IDL spelling.
    #[must_use]
    pub fn from_idl_name(name: &str) -> Option<Self> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.as_str() {
            "short" => Some(Self::Short),
            "long" => Some(Self::Long),
            "long long" => Some(Self::LongLong),
            "unsigned short" => Some(Self::UnsignedShort),
            "unsigned long" => Some(Self::UnsignedLong),
            "unsigned long long" => Some(Self::UnsignedLongLong),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "long double" => Some(Self::LongDouble),
            "char" => Some(Self::Char),
            "wchar" => Some(Self::WChar),
            "boolean" => Some(Self::Boolean),
            "octet" => Some(Self::Octet),
            "any" => Some(Self::Any),
            "Object" => Some(Self::Object),
            "TypeCode" => Some(Self::TypeCode),
            _ => None,
        }
    }

    /// Returns true if this is an integer type usable as a union
    /// discriminant or an array bound.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Short
                | Self::Long
                | Self::LongLong
                | Self::UnsignedShort
                | Self::UnsignedLong
                | Self::UnsignedLongLong
        )
    }
}

/// Direction of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamDirection {
    /// Passed from client to server.
    #[default]
    In,
    /// Passed from server to client.
    Out,
    /// Passed both ways.
    InOut,
}

impl ParamDirection {
    /// Returns the Ada parameter mode.
    #[must_use]
    pub const fn ada_mode(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "in out",
        }
    }

    /// Returns true if the server sends a value back for this parameter.
    #[must_use]
    pub const fn is_returned(&self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }

    /// Returns true if the client sends a value for this parameter.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_wire_size() {
        assert_eq!(PrimitiveType::Octet.wire_size(), Some(1));
        assert_eq!(PrimitiveType::Long.wire_size(), Some(4));
        assert_eq!(PrimitiveType::Double.wire_size(), Some(8));
        assert_eq!(PrimitiveType::Any.wire_size(), None);
    }

    #[test]
    fn test_primitive_fixed_size() {
        assert!(PrimitiveType::UnsignedShort.is_fixed_size());
        assert!(!PrimitiveType::Object.is_fixed_size());
        assert!(!PrimitiveType::TypeCode.is_fixed_size());
    }

    #[test]
    fn test_primitive_ada_type() {
        assert_eq!(PrimitiveType::Long.ada_type(), "Corba.Long");
        assert_eq!(
            PrimitiveType::UnsignedLongLong.ada_type(),
            "Corba.Unsigned_Long_Long"
        );
        assert_eq!(PrimitiveType::Object.ada_type(), "Corba.Object.Ref");
    }

    #[test]
    fn test_primitive_from_idl_name() {
        assert_eq!(
            PrimitiveType::from_idl_name("unsigned  long"),
            Some(PrimitiveType::UnsignedLong)
        );
        assert_eq!(
            PrimitiveType::from_idl_name("long long"),
            Some(PrimitiveType::LongLong)
        );
        assert_eq!(PrimitiveType::from_idl_name("string"), None);
    }

    #[test]
    fn test_primitive_idl_name_round_trip() {
        for prim in [
            PrimitiveType::Short,
            PrimitiveType::LongDouble,
            PrimitiveType::WChar,
            PrimitiveType::TypeCode,
        ] {
            assert_eq!(PrimitiveType::from_idl_name(prim.idl_name()), Some(prim));
        }
    }

    #[test]
    fn test_param_direction() {
        assert_eq!(ParamDirection::InOut.ada_mode(), "in out");
        assert!(ParamDirection::Out.is_returned());
        assert!(!ParamDirection::Out.is_sent());
        assert!(ParamDirection::InOut.is_sent());
        assert_eq!(ParamDirection::default(), ParamDirection::In);
    }
}

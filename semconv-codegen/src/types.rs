//! Declared type → declaration shape
//!
//! Attribute types arrive as the strings written in the schema (`"int"`,
//! `"string[]"`, `"template[double]"`, `"enum"`). Anything without a mapping
//! is rejected, never coerced.

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};
use crate::model::{Attribute, EnumMember, EnumValue};

/// Scalar value types a key can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Boolean,
    String,
    Long,
    Double,
}

impl ScalarType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(ScalarType::Boolean),
            "string" => Some(ScalarType::String),
            "int" | "integer" | "long" => Some(ScalarType::Long),
            "double" => Some(ScalarType::Double),
            _ => None,
        }
    }
}

/// Value type of a key: a scalar or a homogeneous array of scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueType {
    pub scalar: ScalarType,
    pub array: bool,
}

impl ValueType {
    pub const fn scalar(scalar: ScalarType) -> Self {
        Self {
            scalar,
            array: false,
        }
    }

    pub const fn array(scalar: ScalarType) -> Self {
        Self {
            scalar,
            array: true,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.strip_suffix("[]") {
            Some(inner) => ScalarType::parse(inner).map(Self::array),
            None => ScalarType::parse(s).map(Self::scalar),
        }
    }
}

/// Shape of an attribute constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape", content = "value_type")]
pub enum KeyShape {
    /// The constant is the full key.
    Key(ValueType),
    /// The constant is a key prefix completed at runtime.
    TemplatedKey(ValueType),
}

impl KeyShape {
    pub fn value_type(&self) -> ValueType {
        match self {
            KeyShape::Key(t) | KeyShape::TemplatedKey(t) => *t,
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, KeyShape::TemplatedKey(_))
    }
}

/// Result of mapping an attribute's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub shape: KeyShape,
    /// The attribute also needs an enum value container.
    pub enumerated: bool,
}

/// Map an attribute's declared type to its declaration shape.
pub fn map_attribute_type(attr: &Attribute) -> CodegenResult<TypeMapping> {
    let declared = attr.value_type.trim();
    let unsupported = || CodegenError::unsupported_type(&attr.key, &attr.value_type);

    let shape = if let Some(inner) = declared
        .strip_prefix("template[")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        KeyShape::TemplatedKey(ValueType::parse(inner.trim()).ok_or_else(unsupported)?)
    } else if declared == "enum" {
        let scalar = enum_base_type(&attr.members).ok_or_else(unsupported)?;
        KeyShape::Key(ValueType::scalar(scalar))
    } else {
        KeyShape::Key(ValueType::parse(declared).ok_or_else(unsupported)?)
    };

    Ok(TypeMapping {
        shape,
        enumerated: !attr.members.is_empty(),
    })
}

/// Base scalar of an enum: string when every member is a string, long when
/// every member is an integer. `None` for empty or mixed member lists.
pub fn enum_base_type(members: &[EnumMember]) -> Option<ScalarType> {
    let first = members.first()?;
    let base = match first.value {
        EnumValue::Int(_) => ScalarType::Long,
        EnumValue::Str(_) => ScalarType::String,
    };
    let uniform = members.iter().all(|m| {
        matches!(
            (&m.value, base),
            (EnumValue::Int(_), ScalarType::Long) | (EnumValue::Str(_), ScalarType::String)
        )
    });
    uniform.then_some(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn map(value_type: &str) -> CodegenResult<TypeMapping> {
        map_attribute_type(&Attribute::new("first.attr", value_type))
    }

    #[test]
    fn scalar_types() {
        assert_eq!(
            map("boolean").unwrap().shape,
            KeyShape::Key(ValueType::scalar(ScalarType::Boolean))
        );
        assert_eq!(
            map("string").unwrap().shape,
            KeyShape::Key(ValueType::scalar(ScalarType::String))
        );
        assert_eq!(
            map("int").unwrap().shape,
            KeyShape::Key(ValueType::scalar(ScalarType::Long))
        );
        assert_eq!(
            map("double").unwrap().shape,
            KeyShape::Key(ValueType::scalar(ScalarType::Double))
        );
    }

    #[test]
    fn array_types() {
        assert_eq!(
            map("string[]").unwrap().shape,
            KeyShape::Key(ValueType::array(ScalarType::String))
        );
        assert_eq!(
            map("int[]").unwrap().shape,
            KeyShape::Key(ValueType::array(ScalarType::Long))
        );
    }

    #[test]
    fn template_types() {
        let m = map("template[string]").unwrap();
        assert_eq!(
            m.shape,
            KeyShape::TemplatedKey(ValueType::scalar(ScalarType::String))
        );
        assert!(m.shape.is_template());
        assert!(!m.enumerated);
        assert_eq!(
            map("template[double[]]").unwrap().shape,
            KeyShape::TemplatedKey(ValueType::array(ScalarType::Double))
        );
    }

    #[test]
    fn enum_takes_member_base_type() {
        let attr = Attribute::new("fifth.attr_five_string", "enum")
            .with_member(EnumMember::string("one", "one"))
            .with_member(EnumMember::string("two", "two"));
        let m = map_attribute_type(&attr).unwrap();
        assert_eq!(m.shape, KeyShape::Key(ValueType::scalar(ScalarType::String)));
        assert!(m.enumerated);

        let attr = Attribute::new("fifth.attr_five_int", "enum")
            .with_member(EnumMember::int("one", 1));
        assert_eq!(
            map_attribute_type(&attr).unwrap().shape.value_type().scalar,
            ScalarType::Long
        );
    }

    #[test]
    fn unknown_types_rejected() {
        for declared in ["float", "template[enum]", "template[template[string]]", "map", ""] {
            let err = map(declared).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedType, "{declared}");
            assert_eq!(err.subject(), Some("first.attr"));
        }
    }

    #[test]
    fn enum_without_members_rejected() {
        assert_eq!(map("enum").unwrap_err().kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn enum_with_mixed_members_rejected() {
        let attr = Attribute::new("first.attr", "enum")
            .with_member(EnumMember::int("one", 1))
            .with_member(EnumMember::string("two", "two"));
        assert_eq!(
            map_attribute_type(&attr).unwrap_err().kind(),
            ErrorKind::UnsupportedType
        );
    }
}

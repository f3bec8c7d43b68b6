//! Enum value containers
//!
//! An attribute or metric with members gets a container named after its own
//! identifier. Members keep declared order and exact literals; equal values
//! are not merged.

use crate::error::{CodegenError, CodegenResult};
use crate::model::EnumMember;
use crate::naming::{to_const_name, to_doc_brief, to_pascal_case, IdentifierScope};
use crate::plan::{EnumConstant, EnumContainer};
use crate::types::enum_base_type;

/// Suffix appended to the owner's PascalCase identifier.
pub const CONTAINER_SUFFIX: &str = "Values";

/// `FIFTH_ATTR_FIVE_STRING` → `FifthAttrFiveStringValues`.
pub fn container_identifier(owner_identifier: &str) -> String {
    format!("{}{CONTAINER_SUFFIX}", to_pascal_case(owner_identifier))
}

/// Build the container for `owner_key`'s members.
///
/// `owner_identifier` is the already-mapped constant identifier of the
/// owning attribute or metric.
pub fn render_enum_container(
    owner_identifier: &str,
    owner_key: &str,
    members: &[EnumMember],
) -> CodegenResult<EnumContainer> {
    let value_type = enum_base_type(members)
        .ok_or_else(|| CodegenError::unsupported_type(owner_key, describe_members(members)))?;

    let identifier = container_identifier(owner_identifier);
    let mut scope = IdentifierScope::new(&identifier);

    let mut constants = Vec::with_capacity(members.len());
    for (ordinal, member) in members.iter().enumerate() {
        let member_ident = to_const_name(&member.id);
        // Every member is its own source, so a repeated name is always a
        // collision, even for an identical id.
        scope.claim(&member_ident, &format!("{}#{ordinal}", member.id))?;
        constants.push(EnumConstant {
            identifier: member_ident,
            value: member.value.clone(),
            doc: brief_lines(&member.brief),
        });
    }

    Ok(EnumContainer {
        identifier,
        owner: owner_identifier.to_string(),
        value_type,
        members: constants,
        doc: vec![format!("Values for `{owner_key}`")],
    })
}

fn brief_lines(brief: &str) -> Vec<String> {
    let brief = to_doc_brief(brief);
    if brief.is_empty() {
        Vec::new()
    } else {
        vec![brief]
    }
}

fn describe_members(members: &[EnumMember]) -> String {
    if members.is_empty() {
        "enum without members".to_string()
    } else {
        "enum with mixed member types".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::EnumValue;
    use crate::types::ScalarType;

    #[test]
    fn container_named_from_owner_identifier() {
        assert_eq!(
            container_identifier("FIFTH_ATTR_FIVE_STRING"),
            "FifthAttrFiveStringValues"
        );
        assert_eq!(container_identifier("ATTR_ONE"), "AttrOneValues");
    }

    #[test]
    fn string_members_in_declared_order() {
        let members = [
            EnumMember::string("one", "one").with_brief("First enum1 value."),
            EnumMember::string("two", "two").with_brief("Second enum1 value."),
        ];
        let c = render_enum_container("FIFTH_ATTR_FIVE_STRING", "fifth.attr_five_string", &members)
            .unwrap();
        assert_eq!(c.identifier, "FifthAttrFiveStringValues");
        assert_eq!(c.owner, "FIFTH_ATTR_FIVE_STRING");
        assert_eq!(c.value_type, ScalarType::String);
        let names: Vec<_> = c.members.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(names, ["ONE", "TWO"]);
        assert_eq!(c.members[0].value, EnumValue::Str("one".to_string()));
        assert_eq!(c.members[0].doc, ["First enum1 value"]);
    }

    #[test]
    fn order_is_not_sorted() {
        let members = [
            EnumMember::int("zeta", 3),
            EnumMember::int("alpha", 1),
            EnumMember::int("mu", 2),
        ];
        let c = render_enum_container("X", "x", &members).unwrap();
        let names: Vec<_> = c.members.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(names, ["ZETA", "ALPHA", "MU"]);
        assert_eq!(c.value_type, ScalarType::Long);
        assert_eq!(c.members[0].value, EnumValue::Int(3));
    }

    #[test]
    fn equal_values_both_emitted() {
        let members = [EnumMember::int("one", 1), EnumMember::int("uno", 1)];
        let c = render_enum_container("X", "x", &members).unwrap();
        assert_eq!(c.members.len(), 2);
    }

    #[test]
    fn duplicate_member_names_collide() {
        let members = [EnumMember::int("one", 1), EnumMember::int("one", 2)];
        let err = render_enum_container("X", "x", &members).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentifierCollision);
        assert!(err.to_string().contains("XValues"), "{err}");
    }

    #[test]
    fn member_names_collide_after_normalization() {
        let members = [
            EnumMember::string("in-progress", "a"),
            EnumMember::string("in_progress", "b"),
        ];
        let err = render_enum_container("X", "x", &members).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentifierCollision);
    }

    #[test]
    fn mixed_members_rejected() {
        let members = [EnumMember::int("one", 1), EnumMember::string("two", "two")];
        let err = render_enum_container("X", "x", &members).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }
}

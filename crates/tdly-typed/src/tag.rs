//! Type-tag validation
//!
//! Every stored entity carries a `type` discriminant. A well-formed tag is
//! non-empty, has no leading or trailing whitespace, and contains no
//! whitespace other than the ordinary space (`"fa k -e"` is fine, `"fa\tke"`
//! is not).
//!
//! The checks return `Result`; the `is_*` predicates are thin wrappers that
//! fold any failure into `false`.

use crate::value::PropertyValue;

/// Key under which entities store their discriminant
pub const TYPE_KEY: &str = "type";

/// Type-tag failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeTagError {
    /// No string `type` field, or it is empty
    #[error("missing or empty type tag")]
    MissingTypeTag,

    /// Tag has leading or trailing whitespace
    #[error("type tag has leading or trailing whitespace: {0:?}")]
    ExtraWhitespaceTag(String),

    /// Tag contains tab, newline, carriage return, form feed or similar
    #[error("type tag contains whitespace other than spaces: {0:?}")]
    InvalidWhitespaceTag(String),

    /// Tag is well-formed but not one of the permitted tags
    #[error("expected type tag {}, found {actual:?}", expected.join(" | "))]
    WrongTypeTag {
        expected: Vec<String>,
        actual: String,
    },
}

/// Check that a tag string is well-formed
///
/// # Errors
/// - [`TypeTagError::MissingTypeTag`] if empty
/// - [`TypeTagError::InvalidWhitespaceTag`] if any non-space whitespace is present,
///   even when the tag is also padded
/// - [`TypeTagError::ExtraWhitespaceTag`] if padded with spaces
pub fn check_tag(tag: &str) -> Result<(), TypeTagError> {
    if tag.is_empty() {
        return Err(TypeTagError::MissingTypeTag);
    }
    if tag.chars().any(|c| c.is_whitespace() && c != ' ') {
        return Err(TypeTagError::InvalidWhitespaceTag(tag.to_string()));
    }
    if tag.trim() != tag {
        return Err(TypeTagError::ExtraWhitespaceTag(tag.to_string()));
    }
    Ok(())
}

/// Check that a value is a mapping carrying a well-formed type tag
///
/// Returns the tag on success.
pub fn check_typed(value: &PropertyValue) -> Result<&str, TypeTagError> {
    let tag = value
        .get(TYPE_KEY)
        .and_then(PropertyValue::as_str)
        .ok_or(TypeTagError::MissingTypeTag)?;
    check_tag(tag)?;
    Ok(tag)
}

/// Check that a value carries exactly the `expected` tag
pub fn check_of_type<'v>(expected: &str, value: &'v PropertyValue) -> Result<&'v str, TypeTagError> {
    check_one_of(&[expected], value)
}

/// Check that a value carries one of the `expected` tags
pub fn check_one_of<'v, S>(expected: &[S], value: &'v PropertyValue) -> Result<&'v str, TypeTagError>
where
    S: AsRef<str>,
{
    let tag = check_typed(value)?;
    if expected.iter().any(|e| e.as_ref() == tag) {
        Ok(tag)
    } else {
        Err(TypeTagError::WrongTypeTag {
            expected: expected.iter().map(|e| e.as_ref().to_string()).collect(),
            actual: tag.to_string(),
        })
    }
}

/// Whether the value carries a well-formed tag
#[inline]
#[must_use]
pub fn is_typed(value: &PropertyValue) -> bool {
    check_typed(value).is_ok()
}

/// Whether the value carries a well-formed tag equal to `expected`
#[inline]
#[must_use]
pub fn is_of_type(expected: &str, value: &PropertyValue) -> bool {
    check_of_type(expected, value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn typed(tag: &str) -> PropertyValue {
        PropertyValue::from_raw(json!({ "type": tag }))
    }

    #[test]
    fn accepts_interior_spaces() {
        assert_eq!(check_tag("fa k -e"), Ok(()));
        assert_eq!(check_typed(&typed("fa k -e")), Ok("fa k -e"));
    }

    #[test]
    fn rejects_missing_and_empty() {
        assert_eq!(check_typed(&PropertyValue::Absent), Err(TypeTagError::MissingTypeTag));
        assert_eq!(check_typed(&typed("")), Err(TypeTagError::MissingTypeTag));
        let numeric = PropertyValue::from_raw(json!({ "type": 4 }));
        assert_eq!(check_typed(&numeric), Err(TypeTagError::MissingTypeTag));
        let null = PropertyValue::from_raw(json!({ "type": null }));
        assert_eq!(check_typed(&null), Err(TypeTagError::MissingTypeTag));
    }

    #[test]
    fn padded_tag_is_extra_whitespace() {
        assert!(matches!(check_tag(" fake"), Err(TypeTagError::ExtraWhitespaceTag(_))));
        assert!(matches!(check_tag("fake  "), Err(TypeTagError::ExtraWhitespaceTag(_))));
    }

    #[test]
    fn tab_inside_padding_is_invalid_whitespace() {
        assert!(matches!(check_tag(" fa\tke "), Err(TypeTagError::InvalidWhitespaceTag(_))));
        assert!(matches!(check_tag("\tfake"), Err(TypeTagError::InvalidWhitespaceTag(_))));
    }

    #[test]
    fn wrong_type_lists_expected() {
        let err = check_one_of(&["Item", "Tag"], &typed("List")).unwrap_err();
        assert_eq!(
            err,
            TypeTagError::WrongTypeTag {
                expected: vec!["Item".into(), "Tag".into()],
                actual: "List".into(),
            }
        );
        assert!(err.to_string().contains("Item | Tag"));
    }

    #[test]
    fn predicates_never_fail() {
        assert!(is_of_type("Item", &typed("Item")));
        assert!(!is_of_type("Item", &typed("Tag")));
        assert!(!is_of_type("Item", &typed("It\nem")));
        assert!(!is_typed(&PropertyValue::Absent));
    }

    fn vertical_whitespace() -> impl Strategy<Value = char> {
        prop_oneof![Just('\t'), Just('\n'), Just('\r'), Just('\u{0c}')]
    }

    proptest! {
        #[test]
        fn prop_vertical_whitespace_anywhere_is_invalid(
            prefix in "[a-zA-Z ]{0,8}",
            suffix in "[a-zA-Z ]{0,8}",
            ws in vertical_whitespace(),
            pad_left in 0usize..3,
            pad_right in 0usize..3,
        ) {
            let tag = format!(
                "{}{}{}{}{}",
                " ".repeat(pad_left),
                prefix,
                ws,
                suffix,
                " ".repeat(pad_right)
            );
            prop_assert!(matches!(check_tag(&tag), Err(TypeTagError::InvalidWhitespaceTag(_))));
        }

        #[test]
        fn prop_space_padding_is_extra_whitespace(
            body in "[a-zA-Z]([a-zA-Z ]{0,8}[a-zA-Z])?",
            pad_left in 0usize..3,
            pad_right in 0usize..3,
        ) {
            prop_assume!(pad_left + pad_right > 0);
            let tag = format!("{}{}{}", " ".repeat(pad_left), body, " ".repeat(pad_right));
            prop_assert!(matches!(check_tag(&tag), Err(TypeTagError::ExtraWhitespaceTag(_))));
        }

        #[test]
        fn prop_unpadded_space_separated_tags_are_valid(
            body in "[a-zA-Z-]([a-zA-Z -]{0,8}[a-zA-Z-])?",
        ) {
            prop_assert_eq!(check_tag(&body), Ok(()));
        }
    }
}

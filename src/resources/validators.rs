//! Configuration validators shared by the resource handlers.
//!
//! Validators only look at concrete values. `Null` and `Unknown` attributes
//! pass, since an unknown value can only be checked once it is known.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use crate::types::{Attr, AttributePath, Diagnostics};

/// Stripe's metadata limits.
const METADATA_MAX_KEYS: usize = 50;
const METADATA_MAX_KEY_LENGTH: usize = 40;
const METADATA_MAX_VALUE_LENGTH: usize = 500;

fn invalid_value(diags: &mut Diagnostics, path: AttributePath, detail: String) {
    diags.add_attribute_error(path, "Invalid Attribute Value", detail);
}

/// Checks that a string is one of `allowed`.
pub(super) fn one_of(diags: &mut Diagnostics, path: AttributePath, value: &Attr<String>, allowed: &[&str]) {
    let Some(value) = value.value() else {
        return;
    };
    if !allowed.contains(&value.as_str()) {
        let quoted: Vec<String> = allowed.iter().map(|a| format!("{a:?}")).collect();
        diags.add_attribute_error(
            path.clone(),
            "Invalid Attribute Value Match",
            format!(
                "Attribute {path} value must be one of: [{}], got: {value:?}",
                quoted.join(" ")
            ),
        );
    }
}

/// Checks that a string starts with `prefix`.
pub(super) fn has_prefix(
    diags: &mut Diagnostics,
    path: AttributePath,
    value: &Attr<String>,
    prefix: &str,
    message: &str,
) {
    let Some(value) = value.value() else {
        return;
    };
    if !value.starts_with(prefix) {
        diags.add_attribute_error(
            path.clone(),
            "Invalid Attribute Value Match",
            format!("Attribute {path} {message}, got: {value}"),
        );
    }
}

/// Checks that a number is at least `min`.
pub(super) fn at_least<T: PartialOrd + Display>(
    diags: &mut Diagnostics,
    path: AttributePath,
    value: &Attr<T>,
    min: T,
) {
    let Some(value) = value.value() else {
        return;
    };
    if *value < min {
        invalid_value(
            diags,
            path.clone(),
            format!("Attribute {path} value must be at least {min}, got: {value}"),
        );
    }
}

/// Checks that a number lies within `min..=max`.
pub(super) fn between<T: PartialOrd + Display>(
    diags: &mut Diagnostics,
    path: AttributePath,
    value: &Attr<T>,
    min: T,
    max: T,
) {
    let Some(value) = value.value() else {
        return;
    };
    if *value < min || *value > max {
        invalid_value(
            diags,
            path.clone(),
            format!("Attribute {path} value must be between {min} and {max}, got: {value}"),
        );
    }
}

/// Checks that a string has at most `max` characters.
pub(super) fn length_at_most(diags: &mut Diagnostics, path: AttributePath, value: &str, max: usize) {
    let length = value.chars().count();
    if length > max {
        invalid_value(
            diags,
            path.clone(),
            format!("Attribute {path} string length must be at most {max}, got: {length}"),
        );
    }
}

/// Checks that a list has no duplicates and at most `max` elements.
pub(super) fn list<T: Ord + std::fmt::Debug>(
    diags: &mut Diagnostics,
    path: &AttributePath,
    value: &Attr<Vec<T>>,
    max: Option<usize>,
) {
    let Some(items) = value.value() else {
        return;
    };
    let mut seen = BTreeSet::new();
    for (i, item) in items.iter().enumerate() {
        if !seen.insert(item) {
            diags.add_attribute_error(
                path.index(i),
                "Duplicate List Value",
                format!("This attribute contains duplicate values of: {item:?}"),
            );
        }
    }
    if let Some(max) = max {
        if items.len() > max {
            invalid_value(
                diags,
                path.clone(),
                format!(
                    "Attribute {path} list must contain at most {max} elements, got: {}",
                    items.len()
                ),
            );
        }
    }
}

/// Checks Stripe's metadata limits.
pub(super) fn metadata(diags: &mut Diagnostics, value: &Attr<BTreeMap<String, String>>) {
    let Some(entries) = value.value() else {
        return;
    };
    let path = AttributePath::root("metadata");
    if entries.len() > METADATA_MAX_KEYS {
        invalid_value(
            diags,
            path.clone(),
            format!(
                "Attribute {path} map must contain at most {METADATA_MAX_KEYS} elements, got: {}",
                entries.len()
            ),
        );
    }
    for (key, value) in entries {
        length_at_most(diags, path.key(key.as_str()), key, METADATA_MAX_KEY_LENGTH);
        length_at_most(diags, path.key(key.as_str()), value, METADATA_MAX_VALUE_LENGTH);
    }
}

/// Reports `path` when both it and `other` are set.
///
/// Unknown values count as set.
pub(super) fn conflicts_with(diags: &mut Diagnostics, path: AttributePath, set: bool, other: &str, other_set: bool) {
    if set && other_set {
        diags.add_attribute_error(
            path.clone(),
            "Invalid Attribute Combination",
            format!("Attribute \"{other}\" cannot be specified when \"{path}\" is specified"),
        );
    }
}

/// Reports `path` when it is set but `required` is not.
pub(super) fn also_requires(
    diags: &mut Diagnostics,
    path: AttributePath,
    set: bool,
    required: &str,
    required_set: bool,
) {
    if set && !required_set {
        diags.add_attribute_error(
            path.clone(),
            "Invalid Attribute Combination",
            format!("Attribute \"{required}\" must be specified when \"{path}\" is specified"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of_rejects_unlisted_value() {
        let mut diags = Diagnostics::new();
        one_of(
            &mut diags,
            AttributePath::root("duration"),
            &Attr::Value("weekly".to_string()),
            &["forever", "once", "repeating"],
        );
        let diag = diags.iter().next().unwrap();
        assert_eq!(
            diag.detail,
            r#"Attribute duration value must be one of: ["forever" "once" "repeating"], got: "weekly""#
        );
    }

    #[test]
    fn test_unknown_values_pass() {
        let mut diags = Diagnostics::new();
        one_of(&mut diags, AttributePath::root("duration"), &Attr::Unknown, &["once"]);
        at_least(&mut diags, AttributePath::root("max_redemptions"), &Attr::<i64>::Unknown, 1);
        list::<String>(&mut diags, &AttributePath::root("images"), &Attr::Unknown, Some(8));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_between_bounds_are_inclusive() {
        let mut diags = Diagnostics::new();
        let path = AttributePath::root("percent_off");
        between(&mut diags, path.clone(), &Attr::Value(1.0), 1.0, 100.0);
        between(&mut diags, path.clone(), &Attr::Value(100.0), 1.0, 100.0);
        assert!(diags.is_empty());
        between(&mut diags, path, &Attr::Value(100.5), 1.0, 100.0);
        assert!(diags.has_error());
    }

    #[test]
    fn test_list_reports_duplicates_and_size() {
        let mut diags = Diagnostics::new();
        let images: Vec<String> = ["a", "b", "a"].iter().map(ToString::to_string).collect();
        list(&mut diags, &AttributePath::root("images"), &Attr::Value(images), Some(2));
        let paths: Vec<String> = diags
            .iter()
            .filter_map(|d| d.path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, vec!["images[2]", "images"]);
    }

    #[test]
    fn test_metadata_key_too_long() {
        let mut diags = Diagnostics::new();
        let key = "k".repeat(41);
        let entries = BTreeMap::from([(key, "v".to_string())]);
        metadata(&mut diags, &Attr::Value(entries));
        assert_eq!(diags.len(), 1);
        assert!(diags.iter().next().unwrap().detail.contains("at most 40"));
    }

    #[test]
    fn test_conflicts_with() {
        let mut diags = Diagnostics::new();
        conflicts_with(&mut diags, AttributePath::root("percent_off"), true, "currency_options", false);
        assert!(diags.is_empty());
        conflicts_with(&mut diags, AttributePath::root("percent_off"), true, "currency_options", true);
        assert!(diags.has_error());
    }
}

//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid module name (lowercase identifier)
    pub fn module_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,20}"
    }

    /// Generate a dotted attribute path of 1-4 segments
    pub fn dotted_path() -> impl Strategy<Value = String> {
        proptest::collection::vec(module_name(), 1..=4).prop_map(|segments| segments.join("."))
    }

    /// Generate a valid branch name
    pub fn branch_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("main".to_string()),
            Just("master".to_string()),
            Just("develop".to_string()),
            "[a-z][a-z0-9/-]{0,15}[a-z0-9]",
        ]
    }

    /// Generate an owner/name repository identifier
    pub fn repo_identifier() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9-]{0,12}", "[a-z][a-z0-9-]{0,12}")
            .prop_map(|(owner, name)| format!("{owner}/{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_module_name_generator(name in module_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().next().unwrap().is_ascii_lowercase());
        }

        #[test]
        fn test_dotted_path_generator(path in dotted_path()) {
            prop_assert!(!path.starts_with('.'));
            prop_assert!(!path.ends_with('.'));
            prop_assert!(path.split('.').count() <= 4);
        }

        #[test]
        fn test_repo_identifier_generator(id in repo_identifier()) {
            prop_assert_eq!(id.split('/').count(), 2);
        }
    }
}

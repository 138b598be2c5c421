//! Property tests for runtime argument lists and `-D` assignments.

use proptest::prelude::*;

use mule_deployer::domain::services::split_arguments;
use mule_deployer::infrastructure::properties::{env_var_name, parse_assignment};

fn argument() -> impl Strategy<Value = String> {
    proptest::string::string_regex("-?[A-Za-z0-9.=_-]{1,16}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Joining arguments with commas and splitting gives them back.
    #[test]
    fn property_split_recovers_joined_arguments(
        args in proptest::collection::vec(argument(), 0..8)
    ) {
        let joined = args.join(", ");
        prop_assert_eq!(split_arguments(&joined), args);
    }

    /// PROPERTY: Split segments are never blank and never padded.
    #[test]
    fn property_split_yields_trimmed_segments(
        raw in "(?s).{0,128}"
    ) {
        for segment in split_arguments(&raw) {
            prop_assert!(!segment.is_empty());
            prop_assert_eq!(segment.trim(), segment.as_str());
            prop_assert!(!segment.contains(','));
        }
    }

    /// PROPERTY: An assignment splits at its first '=' only.
    #[test]
    fn property_assignment_keeps_equals_in_value(
        key in "[A-Za-z][A-Za-z0-9.]{0,24}",
        value in "[A-Za-z0-9=/:._-]{0,32}"
    ) {
        let (parsed_key, parsed_value) = parse_assignment(&format!("{}={}", key, value)).unwrap();
        prop_assert_eq!(parsed_key, key);
        prop_assert_eq!(parsed_value, value);
    }

    /// PROPERTY: Environment names carry no separators and no lowercase.
    #[test]
    fn property_env_names_are_shell_safe(
        key in "[A-Za-z0-9.-]{1,32}"
    ) {
        let name = env_var_name(&key);
        prop_assert!(name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        prop_assert_eq!(name.len(), key.len());
    }
}

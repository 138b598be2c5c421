//! Property tests for archive include/exclude patterns.

use std::path::Path;

use proptest::prelude::*;

use mule_deployer::domain::value_objects::ArchivePatterns;

fn relative_path() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z0-9][a-z0-9_-]{0,11}").unwrap();
    (proptest::collection::vec(segment, 1..=4), "[a-z]{1,4}")
        .prop_map(|(segments, ext)| format!("{}.{}", segments.join("/"), ext))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Compiling arbitrary pattern text never panics.
    #[test]
    fn property_pattern_compilation_never_panics(
        includes in proptest::collection::vec("(?s).{0,32}", 0..4),
        excludes in proptest::collection::vec("(?s).{0,32}", 0..4)
    ) {
        let _ = ArchivePatterns::new(&includes, &excludes);
    }

    /// PROPERTY: With no caller patterns, ordinary source files are archived.
    #[test]
    fn property_plain_files_pass_default_filter(
        path in relative_path()
    ) {
        let patterns = ArchivePatterns::defaults_only();
        prop_assert!(patterns.accepts(Path::new(&path)));
    }

    /// PROPERTY: Anything under a .git directory is never archived.
    #[test]
    fn property_git_metadata_is_always_excluded(
        path in relative_path(),
        excludes in proptest::collection::vec("[a-z*]{1,6}", 0..3)
    ) {
        let patterns = ArchivePatterns::new(&[], &excludes).unwrap();
        let nested = format!(".git/{}", path);
        prop_assert!(!patterns.accepts(Path::new(&nested)));
    }

    /// PROPERTY: Excluding an extension drops every file carrying it.
    #[test]
    fn property_extension_exclude_applies_at_any_depth(
        path in relative_path()
    ) {
        let ext = path.rsplit('.').next().unwrap().to_string();
        let patterns = ArchivePatterns::new(&[], &[format!("*.{}", ext)]).unwrap();
        prop_assert!(!patterns.accepts(Path::new(&path)));
    }
}

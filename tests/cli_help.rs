//! Top-level CLI surface

mod common;

use common::*;

#[test]
fn help_lists_every_command() {
    let env = TestEnv::new();

    let result = env.run(&["--help"]);

    assert!(result.success);
    for command in ["validate", "package", "resolve", "deploy", "undeploy", "redeploy"] {
        assert!(result.stdout.contains(command), "help is missing {}", command);
    }
}

#[test]
fn version_matches_the_package() {
    let env = TestEnv::new();

    let result = env.run(&["--version"]);

    assert!(result.success);
    assert!(result.stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_command_is_a_usage_error() {
    let env = TestEnv::new();

    let result = env.run(&["publish"]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 2);
}

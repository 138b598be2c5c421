//! Test fixtures - project file contents shared by the CLI tests.

/// Standalone deployment of `hello`, polling fast enough for tests
pub const HELLO_PROJECT: &str = r#"
[project]
group_id = "org.example"
artifact_id = "hello"
version = "1.0.0"

[deployment]
kind = "standalone"
deployment_timeout = 20000
poll_interval = 50
"#;

/// Same project with a deployment window no runtime can meet
pub const IMPATIENT_PROJECT: &str = r#"
[project]
group_id = "org.example"
artifact_id = "hello"
version = "1.0.0"

[deployment]
kind = "standalone"
deployment_timeout = 300
poll_interval = 50
"#;

/// Platform-hosted deployment, which needs a remote control plane
pub const PLATFORM_HOSTED_PROJECT: &str = r#"
[project]
group_id = "org.example"
artifact_id = "hello"
version = "1.0.0"

[deployment]
kind = "platform-hosted"
username = "deployer"
password = "secret"
environment = "Sandbox"
"#;

pub const ARTIFACT_DESCRIPTOR: &str = r#"{ "minMuleVersion": "4.4.0" }"#;

pub const HELLO_FLOW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mule xmlns="http://www.mulesoft.org/schema/mule/core">
    <flow name="hello-flow"/>
</mule>
"#;

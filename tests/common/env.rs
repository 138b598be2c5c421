//! Test environment builder for isolated mule-deployer runs.
//!
//! Provides `TestEnv` - temp directories for the project, the user config
//! directory and a runtime home, plus helpers to run the CLI against them.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use mule_deployer::domain::ports::keys;
use mule_deployer::infrastructure::fs::CONFIG_DIR_VAR;
use mule_deployer::infrastructure::properties::env_var_name;

use super::fixtures;

/// Result of running a mule-deployer command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse every stdout line as JSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("stdout line is not JSON ({}): {}", e, line))
            })
            .collect()
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Project root holding `mule-deploy.toml`
    pub project_root: TempDir,
    /// User config directory (`MULE_DEPLOYER_CONFIG_DIR`)
    pub config_dir: TempDir,
    /// Scratch runtime home for standalone deployments
    pub runtime_home: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    /// Empty environment, no project files written
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("Failed to create project dir"),
            config_dir: TempDir::new().expect("Failed to create config dir"),
            runtime_home: TempDir::new().expect("Failed to create runtime home"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_mule-deployer")),
        }
    }

    /// Environment holding a valid Mule application named `hello`
    pub fn with_application() -> Self {
        let env = Self::new();
        env.write_project_file("mule-deploy.toml", fixtures::HELLO_PROJECT);
        env.write_project_file("mule-artifact.json", fixtures::ARTIFACT_DESCRIPTOR);
        env.write_project_file("src/main/mule/hello.xml", fixtures::HELLO_FLOW);
        env
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn runtime_path(&self, relative: &str) -> PathBuf {
        self.runtime_home.path().join(relative)
    }

    /// `-D mule.home=<runtime home>` as CLI arguments
    pub fn mule_home_arg(&self) -> String {
        format!("{}={}", keys::MULE_HOME, self.runtime_home.path().display())
    }

    /// Run the CLI from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.project_root.path(), args)
    }

    /// Run the CLI from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        self.run_with_env(cwd, args, &[])
    }

    /// Run the CLI with extra environment variables
    pub fn run_with_env(&self, cwd: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = self.command(cwd, args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        execute(cmd)
    }

    /// Run the CLI from the project root with variables that need not be Unicode
    pub fn run_with_os_env(&self, args: &[&str], env_vars: &[(&OsStr, &OsStr)]) -> TestResult {
        let mut cmd = self.command(self.project_root.path(), args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        execute(cmd)
    }

    fn command(&self, cwd: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(cwd)
            .args(args)
            .env(CONFIG_DIR_VAR, self.config_dir.path())
            .env_remove("MULE_DEPLOYER_LOG");

        // the host environment must not leak into the override layers
        for key in keys::ALL {
            cmd.env_remove(env_var_name(key));
        }
        cmd
    }

    /// Write a file below the project root
    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        write_file(&self.project_path(relative_path), content);
    }

    /// Write the user properties file
    pub fn write_user_properties(&self, content: &str) {
        write_file(&self.config_dir.path().join("properties.toml"), content);
    }

    /// Write a file below the runtime home
    pub fn write_runtime_file(&self, relative_path: &str, content: &str) {
        write_file(&self.runtime_path(relative_path), content);
    }

    /// Play the runtime: once `apps/<application>.jar` shows up, write its
    /// start anchor. Gives up after `patience`.
    pub fn start_when_dropped(&self, application: &str, patience: Duration) -> JoinHandle<bool> {
        self.start_when_replaced(application, None, patience)
    }

    /// Like `start_when_dropped`, ignoring an archive that still holds `stale`
    pub fn start_when_replaced(
        &self,
        application: &str,
        stale: Option<&[u8]>,
        patience: Duration,
    ) -> JoinHandle<bool> {
        let apps = self.runtime_path("apps");
        let archive = apps.join(format!("{}.jar", application));
        let anchor = apps.join(format!("{}-anchor.txt", application));
        let stale = stale.map(<[u8]>::to_vec);

        std::thread::spawn(move || {
            let deadline = Instant::now() + patience;
            while Instant::now() < deadline {
                let dropped = match std::fs::read(&archive) {
                    Ok(bytes) => stale.as_deref() != Some(bytes.as_slice()),
                    Err(_) => false,
                };
                if dropped {
                    std::fs::write(&anchor, "started").expect("Failed to write anchor");
                    return true;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            false
        })
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

fn execute(mut cmd: Command) -> TestResult {
    let output = cmd.output().expect("Failed to execute mule-deployer");
    output_to_result(output)
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

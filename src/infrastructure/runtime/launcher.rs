//! Runtime launcher
//!
//! Starts a Mule runtime through its launcher script (`<script> start <args>`)
//! and waits for the script to exit, bounded by the start timeout.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

const WAIT_STEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub script: PathBuf,
    pub arguments: Vec<String>,
    pub timeout: Option<Duration>,
}

impl Launcher {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            arguments: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `<script> start <arguments>` with `MULE_HOME` set to `home`
    pub fn start(&self, home: &Path) -> io::Result<()> {
        info!(script = %self.script.display(), home = %home.display(), "starting runtime");
        let mut child = Command::new(&self.script)
            .arg("start")
            .args(&self.arguments)
            .env("MULE_HOME", home)
            .current_dir(home)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                debug!(%status, "launcher exited");
                if status.success() {
                    return Ok(());
                }
                return Err(io::Error::other(format!(
                    "{} start exited with {}",
                    self.script.display(),
                    status
                )));
            }
            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!(
                            "{} start did not finish within {}ms",
                            self.script.display(),
                            timeout.as_millis()
                        ),
                    ));
                }
            }
            thread::sleep(WAIT_STEP);
        }
    }
}

#![allow(dead_code)]

use runbound::config::{ConfigFile, RawConfigFile};
use runbound::types::{FailureClass, RetryOn};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn timeout(mut self, secs: f64) -> Self {
        self.config.exec.timeout = secs;
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.config.exec.exit_code = code;
        self
    }

    pub fn ignore_exit_status(mut self, val: bool) -> Self {
        self.config.exec.ignore_exit_status = val;
        self
    }

    pub fn silence(mut self, val: bool) -> Self {
        self.config.exec.silence = val;
        self
    }

    pub fn shell(mut self, shell: &str) -> Self {
        self.config.exec.shell = shell.to_string();
        self
    }

    pub fn tries(mut self, tries: u32) -> Self {
        self.config.retry.tries = tries;
        self
    }

    pub fn retry_on(mut self, class: FailureClass) -> Self {
        if let RetryOn::Only(classes) = &mut self.config.retry.on {
            classes.push(class);
        } else {
            self.config.retry.on = RetryOn::Only(vec![class]);
        }
        self
    }

    pub fn delay(mut self, secs: f64) -> Self {
        self.config.retry.delay = secs;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

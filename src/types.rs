use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Coarse classification of a [`RunboundError`](crate::errors::RunboundError).
///
/// Retry policies enrol classes rather than concrete error values, so a
/// policy read from a config file can name them as plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    Launch,
    Timeout,
    ExitStatus,
    Usage,
    Unsupported,
    Io,
    Config,
    Other,
}

impl FailureClass {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureClass::Launch => "launch",
            FailureClass::Timeout => "timeout",
            FailureClass::ExitStatus => "exit_status",
            FailureClass::Usage => "usage",
            FailureClass::Unsupported => "unsupported",
            FailureClass::Io => "io",
            FailureClass::Config => "config",
            FailureClass::Other => "other",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailureClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "launch" => Ok(FailureClass::Launch),
            "timeout" => Ok(FailureClass::Timeout),
            "exit_status" => Ok(FailureClass::ExitStatus),
            "usage" => Ok(FailureClass::Usage),
            "unsupported" => Ok(FailureClass::Unsupported),
            "io" => Ok(FailureClass::Io),
            "config" => Ok(FailureClass::Config),
            "other" => Ok(FailureClass::Other),
            other => Err(format!(
                "invalid failure class: {other} (expected one of launch, timeout, \
                 exit_status, usage, unsupported, io, config, other)"
            )),
        }
    }
}

/// Which failures a retry policy catches.
///
/// In TOML this is either the string `"any"` or a list of class names:
///
/// ```toml
/// on = "any"
/// on = ["timeout", "exit_status"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRetryOn")]
pub enum RetryOn {
    Any,
    Only(Vec<FailureClass>),
}

impl Default for RetryOn {
    fn default() -> Self {
        RetryOn::Any
    }
}

impl RetryOn {
    pub fn matches(&self, class: FailureClass) -> bool {
        match self {
            RetryOn::Any => true,
            RetryOn::Only(classes) => classes.contains(&class),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRetryOn {
    Single(String),
    List(Vec<FailureClass>),
}

impl TryFrom<RawRetryOn> for RetryOn {
    type Error = String;

    fn try_from(raw: RawRetryOn) -> Result<Self, Self::Error> {
        match raw {
            RawRetryOn::Single(s) if s.trim().eq_ignore_ascii_case("any") => Ok(RetryOn::Any),
            RawRetryOn::Single(s) => Ok(RetryOn::Only(vec![s.parse()?])),
            RawRetryOn::List(classes) => Ok(RetryOn::Only(classes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_names_case_and_dash_insensitive() {
        assert_eq!("Exit-Status".parse::<FailureClass>(), Ok(FailureClass::ExitStatus));
        assert_eq!(" timeout ".parse::<FailureClass>(), Ok(FailureClass::Timeout));
        assert!("segfault".parse::<FailureClass>().is_err());
    }

    #[test]
    fn retry_on_any_matches_everything() {
        assert!(RetryOn::Any.matches(FailureClass::Usage));
        let only = RetryOn::Only(vec![FailureClass::Timeout]);
        assert!(only.matches(FailureClass::Timeout));
        assert!(!only.matches(FailureClass::ExitStatus));
    }
}

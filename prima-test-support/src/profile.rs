//! Property-test run profile shared by every proptest suite.
//!
//! `PROGTEST_CASES` overrides the case count and `PRIMA_PBT_FORK` toggles
//! forked execution. Invalid overrides are logged and ignored.

use std::{env, fmt};

/// Environment variable overriding the proptest case count.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable overriding proptest forking.
pub const PRIMA_PBT_FORK_ENV_KEY: &str = "PRIMA_PBT_FORK";

/// Resolved case count and fork setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

/// Why an override was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
enum RejectedOverride {
    NotANumber,
    ZeroCases,
    NotABoolean,
}

impl fmt::Display for RejectedOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotANumber => "expected a positive integer",
            Self::ZeroCases => "case count must be at least 1",
            Self::NotABoolean => "expected true/false, 1/0, yes/no or on/off",
        })
    }
}

impl ProptestRunProfile {
    /// Resolves the profile from the environment, falling back to the given
    /// defaults.
    ///
    /// # Examples
    /// ```
    /// use prima_test_support::profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(PRIMA_PBT_FORK_ENV_KEY, default_fork, parse_flag),
        }
    }

    /// Cases to run per property.
    #[must_use]
    #[rustfmt::skip]
    pub fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    #[rustfmt::skip]
    pub fn fork(&self) -> bool { self.fork }
}

fn override_or<T>(
    key: &'static str,
    default: T,
    parse: impl Fn(&str) -> Result<T, RejectedOverride>,
) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(raw.trim()).unwrap_or_else(|reason| {
        tracing::warn!(env = key, raw = %raw, %reason, "ignoring property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, RejectedOverride> {
    match raw.parse::<u32>() {
        Ok(0) => Err(RejectedOverride::ZeroCases),
        Ok(cases) => Ok(cases),
        Err(_) => Err(RejectedOverride::NotANumber),
    }
}

fn parse_flag(raw: &str) -> Result<bool, RejectedOverride> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RejectedOverride::NotABoolean),
    }
}

//! Environment resolution
//!
//! Maps the optional `TEST_ENV` override (a symbolic environment name or a
//! literal URL) to the base URL every page navigates against. The result is
//! computed once and handed to [`crate::session::PageSession`] explicitly.

use std::fmt;
use std::str::FromStr;

/// Environment variable holding the override
pub const ENV_OVERRIDE_VAR: &str = "TEST_ENV";

/// Environment used when the override is absent or unrecognized
pub const DEFAULT_ENVIRONMENT: Environment = Environment::Qat;

const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Known deployment of the payment-link portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Dev,
    Qat,
    Uat,
}

impl Environment {
    /// All known environments
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Qat, Environment::Uat];

    /// Symbolic name, lower case
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Qat => "qat",
            Environment::Uat => "uat",
        }
    }

    /// Base URL of the login route
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Dev => "https://dev.paylink.example.com/#/login",
            Environment::Qat => "https://qat.paylink.example.com/#/login",
            Environment::Uat => "https://uat.paylink.example.com/#/login",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Environment::ALL
            .into_iter()
            .find(|env| env.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Outcome of resolving the override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    /// Matched symbolic environment; `None` when a literal URL was given
    pub environment: Option<Environment>,
    /// URL used for navigation
    pub base_url: String,
}

impl ResolvedEnvironment {
    /// Resolve an optional override value
    ///
    /// Symbolic names match case-insensitively. Values starting with
    /// `http://` or `https://` are returned unchanged. Anything else,
    /// including an empty string, silently falls back to [`DEFAULT_ENVIRONMENT`].
    pub fn resolve(override_value: Option<&str>) -> Self {
        let value = override_value.map(str::trim).unwrap_or_default();

        if let Ok(environment) = value.parse::<Environment>() {
            return Self::known(environment);
        }

        if is_absolute_url(value) {
            return Self {
                environment: None,
                base_url: value.to_string(),
            };
        }

        Self::known(DEFAULT_ENVIRONMENT)
    }

    /// Resolve from the process environment
    pub fn from_env() -> Self {
        let value = std::env::var(ENV_OVERRIDE_VAR).ok();
        let resolved = Self::resolve(value.as_deref());
        tracing::info!(
            "Resolved environment: {} -> {}",
            resolved.label(),
            resolved.base_url
        );
        resolved
    }

    fn known(environment: Environment) -> Self {
        Self {
            environment: Some(environment),
            base_url: environment.base_url().to_string(),
        }
    }

    /// Name for logs: the symbolic name, or `custom`
    pub fn label(&self) -> &str {
        self.environment.map(|e| e.name()).unwrap_or("custom")
    }

    /// Scheme and host of the base URL, without path or fragment
    pub fn origin(&self) -> &str {
        let after_scheme = self.base_url.find("://").map(|i| i + 3).unwrap_or(0);
        match self.base_url[after_scheme..].find(['/', '#', '?']) {
            Some(end) => &self.base_url[..after_scheme + end],
            None => &self.base_url,
        }
    }

    /// URL of an in-app hash route such as `#/payment-links`
    pub fn route(&self, route: &str) -> String {
        format!("{}/{}", self.origin(), route.trim_start_matches('/'))
    }
}

impl Default for ResolvedEnvironment {
    fn default() -> Self {
        Self::known(DEFAULT_ENVIRONMENT)
    }
}

fn is_absolute_url(value: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

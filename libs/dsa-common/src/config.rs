// Environment-derived harness configuration.
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Toolchain executables and knobs, resolved once at startup.
///
/// The value is passed by reference into the runner and executor; core logic
/// never consults the environment itself. Absent overrides fall back to the
/// well-known toolchain names.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub cpp_compiler: String,
    pub java_compiler: String,
    pub java_runner: String,
    pub python_runner: String,
    pub js_runner: String,
    pub colour: bool,
    /// Bounded wait applied to every child invocation, compile included.
    pub timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            cpp_compiler: "g++".to_string(),
            java_compiler: "javac".to_string(),
            java_runner: "java".to_string(),
            python_runner: "python3".to_string(),
            js_runner: "node".to_string(),
            colour: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl HarnessConfig {
    /// Folds a `.env` file (when present) into the process environment, then
    /// layers overrides on top of the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            cpp_compiler: env::var("CPP_COMPILER").unwrap_or(defaults.cpp_compiler),
            java_compiler: env::var("JAVA_COMPILER").unwrap_or(defaults.java_compiler),
            java_runner: env::var("JAVA_RUNNER").unwrap_or(defaults.java_runner),
            python_runner: env::var("PYTHON_RUNNER").unwrap_or(defaults.python_runner),
            js_runner: env::var("JS_RUNNER").unwrap_or(defaults.js_runner),
            colour: env::var("COLOUR")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            timeout: env::var("DSA_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        }
    }
}

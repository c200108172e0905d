//! # Engine Configuration Handling
//!
//! A [`Config`] turns one flattened argument string into an owned, validated
//! engine configuration. Parsing outcomes are recorded as state and polled
//! through accessors; nothing is thrown across the bridge boundary. Engine
//! diagnostics are kept per instance, so concurrently configured instances
//! cannot interfere with each other.

use crate::engine::EngineConfig;

/// Status of a [`Config`], with the discriminants exposed across the bridge
/// boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum ConfigStatus {
    /// `configure` has not (successfully or not) been run yet
    NotConfigured = 0,
    /// The instance holds a validated engine configuration
    Valid = 1,
    /// The last `configure` call failed
    Error = 2,
}

/// Bridge message for an argument list exceeding the token budget
const TOO_MANY_ARGS_MSG: &str =
    "Too many arguments were given, create the configuration with a higher value of max_args!";
/// Generic bridge message for a failed parse; the engine's own diagnostic is
/// available separately
const PARSE_FAILED_MSG: &str =
    "Parsing of the command line arguments failed! Please test with the engine executable.";

/// The synthetic program name heading the argv-style token list, matching the
/// engine parser's expectations
const ARGV0: &str = "satbridge";

/// Splits a flattened argument string into an argv-style token list headed by
/// the program-name placeholder, or reports that the list would exceed
/// `max_args` slots.
fn tokenize(args: &str, max_args: usize) -> Option<Vec<&str>> {
    let mut argv = vec![ARGV0];
    argv.extend(args.split_whitespace());
    if argv.len() > max_args {
        return None;
    }
    Some(argv)
}

/// Owner of one parsed engine configuration.
///
/// Created empty, mutated by [`Config::configure`], read through
/// side-effect-free accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    status: Option<ConfigStatus>,
    err_message: String,
    engine_err_message: String,
    config: Option<EngineConfig>,
}

impl Config {
    /// Creates a fresh, not yet configured instance
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flattened argument string into an owned engine configuration.
    ///
    /// The string is split on whitespace into an argv-style token list headed
    /// by a program-name placeholder; if the list would exceed `max_args`
    /// slots the call fails with a bridge-level message before the engine
    /// parser is consulted. Otherwise the tokens are forwarded to the engine:
    /// success leaves the instance [`ConfigStatus::Valid`], failure leaves it
    /// [`ConfigStatus::Error`] with a generic bridge message, with the
    /// engine's own diagnostic retrievable via
    /// [`Config::engine_error_message`].
    ///
    /// Re-invoking on a non-fresh instance discards the previously owned
    /// configuration before parsing again.
    pub fn configure(&mut self, args: &str, max_args: usize) {
        if self.status.is_some() {
            self.config = None;
            self.status = None;
        }
        self.err_message.clear();
        self.engine_err_message.clear();

        let Some(argv) = tokenize(args, max_args) else {
            self.status = Some(ConfigStatus::Error);
            self.err_message = String::from(TOO_MANY_ARGS_MSG);
            return;
        };

        match EngineConfig::from_argv(argv) {
            Ok(config) => {
                self.config = Some(config);
                self.status = Some(ConfigStatus::Valid);
            }
            Err(err) => {
                self.status = Some(ConfigStatus::Error);
                self.err_message = String::from(PARSE_FAILED_MSG);
                self.engine_err_message = err.to_string();
            }
        }
    }

    /// Gets the configuration status
    #[must_use]
    pub fn status(&self) -> ConfigStatus {
        self.status.unwrap_or(ConfigStatus::NotConfigured)
    }

    /// Gets the bridge-level error message; empty unless the status is
    /// [`ConfigStatus::Error`]
    #[must_use]
    pub fn error_message(&self) -> &str {
        &self.err_message
    }

    /// Gets the diagnostic text the engine produced while parsing; empty if
    /// there was none
    #[must_use]
    pub fn engine_error_message(&self) -> &str {
        &self.engine_err_message
    }

    /// Gets the owned engine configuration, if the instance is valid
    #[must_use]
    pub fn engine_config(&self) -> Option<&EngineConfig> {
        self.config.as_ref()
    }
}

//! Process-wide tunables that can be overridden from environment variables.
//!
//! An [`EnvParam`] couples the name of an environment variable with the textual form of its default
//! value. It is meant for knobs that are too low-level to deserve a command line option but that a
//! user may still want to adjust, e.g. the bound on the number of outgoing edges of a node.
//!
//! ```
//! use env_param::EnvParam;
//! static MAX_OUT_DEGREE: EnvParam<usize> = EnvParam::new("DOC_MAX_OUT_DEGREE", "128");
//!
//! // the variable is not set: the default is used
//! assert_eq!(MAX_OUT_DEGREE.get(), 128);
//! ```
//!
//! The value is resolved once, on first access. Changing the environment afterwards has no effect.
//!
//! ```
//! use env_param::EnvParam;
//! static HORIZON_SLACK: EnvParam<u32> = EnvParam::new("DOC_HORIZON_SLACK", "0");
//!
//! // SAFETY: doc tests run single threaded
//! unsafe { std::env::set_var("DOC_HORIZON_SLACK", "4") };
//! assert_eq!(HORIZON_SLACK.get(), 4);
//!
//! unsafe { std::env::set_var("DOC_HORIZON_SLACK", "9") };
//! assert_eq!(HORIZON_SLACK.get(), 4);
//! ```

use once_cell::sync::OnceCell;
use std::str::FromStr;

pub struct EnvParam<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    /// Declares a parameter read from the environment variable `env`, falling back to `default`
    /// when the variable is absent or unparsable.
    pub const fn new(env: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            value: OnceCell::new(),
            env,
            default,
        }
    }

    /// Name of the environment variable backing this parameter.
    pub fn name(&self) -> &'static str {
        self.env
    }

    /// Returns true if the value has already been resolved (read or explicitly set).
    pub fn is_initialized(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse_default(&self) -> T {
        // the default is a literal of the program, failing to parse it is a bug
        match T::from_str(self.default) {
            Ok(v) => v,
            Err(_) => panic!("[env_param] {}: invalid default value \"{}\".", self.env, self.default),
        }
    }

    fn resolve(&self) -> T {
        match std::env::var(self.env) {
            Ok(raw) => match T::from_str(raw.trim()) {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(
                        param = self.env,
                        value = %raw,
                        default = self.default,
                        "unparsable environment parameter, using default"
                    );
                    self.parse_default()
                }
            },
            Err(std::env::VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                tracing::warn!(param = self.env, %err, default = self.default, "unreadable environment parameter");
                self.parse_default()
            }
        }
    }

    /// Returns the value of the parameter, resolving it on the first call.
    ///
    /// # Panic
    /// Panics if the default value cannot be parsed.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.get_ref()
    }

    /// Same as [`EnvParam::get`] for values that are not `Copy`.
    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| self.resolve())
    }

    /// Forces the value of the parameter.
    ///
    /// Returns the value back if the parameter was already resolved.
    pub fn try_set(&self, value: T) -> Result<(), T> {
        self.value.set(value)
    }

    /// Forces the value of the parameter.
    ///
    /// # Panic
    /// Panics if the parameter has already been resolved, which typically means it was read before.
    pub fn set(&self, value: T) {
        if self.try_set(value).is_err() {
            panic!("Parameter {} is already initialized (i.e. was previously accessed).", self.env);
        }
    }
}

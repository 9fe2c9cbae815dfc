pub mod prompt;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use std::fmt;

/// Environment variable holding the GitHub login
pub const ENV_USER_VAR: &str = "PR_DASH_GH_USER";

/// Environment variable holding the GitHub personal access token
pub const ENV_TOKEN_VAR: &str = "PR_DASH_GH_TOKEN";

pub use prompt::{prompt_for_token, resolve_credentials};

/// Login and token used for every API request of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }

    /// The authenticated login, compared against comment authors.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// base64 of `user:token`, the payload of an `Authorization: Basic` header.
    pub fn encoded(&self) -> String {
        BASE64_STANDARD.encode(format!("{}:{}", self.user, self.token))
    }

    pub fn authorization(&self) -> String {
        format!("Basic {}", self.encoded())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Read an environment variable, treating blank values as unset.
pub fn get_from_env(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

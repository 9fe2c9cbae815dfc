use anyhow::{Context, Result};

use super::{get_from_env, Credentials, ENV_TOKEN_VAR, ENV_USER_VAR};

/// Prompts user to enter GitHub personal access token
pub fn prompt_for_token() -> Result<String> {
    eprintln!("GitHub personal access token required.");
    eprintln!("Create one at: https://github.com/settings/tokens");
    eprintln!("Set {} to skip this prompt.", ENV_TOKEN_VAR);
    eprintln!();

    let token = rpassword::prompt_password("Enter token: ")
        .context("Failed to read token from stdin")?;

    let token = token.trim();

    if token.is_empty() {
        anyhow::bail!("Token cannot be empty");
    }

    Ok(token.to_string())
}

/// Build the run's credentials.
///
/// The login comes from the config file, falling back to `PR_DASH_GH_USER`.
/// The token comes from `PR_DASH_GH_TOKEN`, falling back to an interactive
/// prompt.
pub fn resolve_credentials(config_login: Option<&str>) -> Result<Credentials> {
    let user = match config_login {
        Some(login) if !login.trim().is_empty() => login.trim().to_string(),
        _ => get_from_env(ENV_USER_VAR).with_context(|| {
            format!(
                "No GitHub login configured. Set `login` in the config file or {}",
                ENV_USER_VAR
            )
        })?,
    };

    let token = match get_from_env(ENV_TOKEN_VAR) {
        Some(token) => token,
        None => prompt_for_token()?,
    };

    Ok(Credentials::new(user, token))
}

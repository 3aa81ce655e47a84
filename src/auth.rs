use crate::config::ApiConfig;

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

/// Resolve an optional bearer token for the lecture API:
/// 1. Env var named by `token_env`
/// 2. Output of `token_command`
///
/// The list endpoint is usually public, so no token is not an error.
pub fn load_token(api: &ApiConfig) -> Option<String> {
    if let Some(env_var) = &api.token_env {
        if let Ok(token) = std::env::var(env_var) {
            if !token.is_empty() {
                return Some(token);
            }
        }
    }

    if let Some(cmd) = &api.token_command {
        if let Some(token) = try_cli_token(cmd) {
            return Some(token);
        }
        tracing::warn!("token_command produced no token");
    }

    None
}

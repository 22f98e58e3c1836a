/// ステータスコマンド
///
/// 現在の接続設定（サーバーURL、CSRFトークンの有無と取得元、Cookie）を表示します。
/// サーバーへの通信は行いません。
use crate::commands::result::{CommandResult, StatusResult};
use crate::config::user::{CSRF_TOKEN_ENV, UserConfig, mask_secret};
use anyhow::{Context, Result};

/// ステータスコマンドを実行
///
/// # Returns
/// 成功時はOk(CommandResult)、失敗時はエラー
pub async fn execute() -> Result<CommandResult> {
    let config_path = UserConfig::config_path().context("Failed to locate configuration file")?;
    let config = UserConfig::load_from(&config_path).context("Failed to load configuration file")?;
    let env_token = std::env::var(CSRF_TOKEN_ENV).ok();

    Ok(CommandResult::Status(summarize(
        &config,
        &config_path.display().to_string(),
        env_token.as_deref(),
    )))
}

fn summarize(config: &UserConfig, config_path: &str, env_token: Option<&str>) -> StatusResult {
    let (csrf_token, token_source) = match env_token.filter(|t| !t.is_empty()) {
        Some(token) => (Some(mask_secret(token)), Some("environment".to_string())),
        None => match config.masked_csrf_token() {
            Some(masked) => (Some(masked), Some("config".to_string())),
            None => (None, None),
        },
    };

    StatusResult {
        config_path: config_path.to_string(),
        server_url: config.base_url().to_string(),
        csrf_token,
        token_source,
        has_session_cookie: config.session_cookie.is_some(),
        request_timeout_seconds: config.request_timeout_seconds,
    }
}

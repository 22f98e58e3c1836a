/// 設定コマンド
///
/// サーバーURL、CSRFトークン、セッションCookieをconfig.tomlに保存します。
use crate::commands::result::{CommandResult, ConfigureResult};
use crate::config::user::UserConfig;
use crate::presentation::input;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// 設定コマンドの引数
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    pub server_url: Option<String>,
    pub csrf_token: Option<String>,
    pub session_cookie: Option<String>,
    /// 0 はタイムアウトの解除
    pub request_timeout_seconds: Option<u64>,
    /// トークンをstdinの1行目から読む
    pub token_from_stdin: bool,
}

/// 設定コマンドを実行
///
/// # Returns
/// 成功時はOk(CommandResult)、失敗時はエラー
pub async fn execute(mut options: ConfigureOptions) -> Result<CommandResult> {
    if options.token_from_stdin {
        options.csrf_token = Some(input::read_token_from_stdin()?);
    }

    let config_path = UserConfig::config_path().context("Failed to locate configuration file")?;
    apply(&config_path, options)
}

fn apply(config_path: &Path, options: ConfigureOptions) -> Result<CommandResult> {
    if options.server_url.is_none()
        && options.csrf_token.is_none()
        && options.session_cookie.is_none()
        && options.request_timeout_seconds.is_none()
    {
        bail!("Nothing to configure. Specify --server, --token, --token-stdin, --cookie or --timeout.");
    }

    let mut config =
        UserConfig::load_from(config_path).context("Failed to load configuration file")?;

    if let Some(server_url) = options.server_url {
        config.server_url = server_url.trim().to_string();
    }

    let token_updated = options.csrf_token.is_some();
    if let Some(token) = options.csrf_token {
        // 空文字列は削除として扱う
        config.csrf_token = Some(token).filter(|t| !t.trim().is_empty());
    }

    let cookie_updated = options.session_cookie.is_some();
    if let Some(cookie) = options.session_cookie {
        config.session_cookie = Some(cookie).filter(|c| !c.trim().is_empty());
    }

    if let Some(seconds) = options.request_timeout_seconds {
        config.request_timeout_seconds = Some(seconds).filter(|s| *s > 0);
    }

    // 保存前に検証して、不正な値をディスクに書かない
    config
        .validate()
        .context("Invalid configuration value")?;
    config
        .save_to(config_path)
        .context("Failed to save configuration file")?;

    tracing::info!(path = %config_path.display(), token_updated, cookie_updated, "configuration saved");

    Ok(CommandResult::Configure(ConfigureResult {
        config_path: config_path.display().to_string(),
        server_url: config.server_url,
        token_updated,
        cookie_updated,
    }))
}

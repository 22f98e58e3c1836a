/// ユーザー設定モジュール
///
/// 実行時にユーザーディレクトリから読み込まれる動的設定を管理します。
/// Windows: C:\Users\<User>\AppData\Roaming\lecture-uploader\config.toml
/// macOS:   /Users/<User>/Library/Application Support/lecture-uploader/config.toml
/// Linux:   /home/<user>/.config/lecture-uploader/config.toml
///
/// 初回起動時にデフォルト値から自動的にconfig.tomlを作成します。
use crate::config::app::APP_CONFIG;
use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// 保存済みトークンより優先される環境変数
pub const CSRF_TOKEN_ENV: &str = "LECTURE_UPLOADER_CSRF_TOKEN";

fn default_server_url() -> String {
    APP_CONFIG.api.default_server_url.to_string()
}

/// ユーザー設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// 講義サーバーのベースURL（例: "https://lectures.example.com"）
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// CSRFトークン（ブラウザのmetaタグ `csrf-token` の値）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,

    /// ログイン済みセッションのCookie（"session=..." 形式）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    /// リクエスト単位のタイムアウト(秒)。未設定ならタイムアウトなし
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            csrf_token: None,
            session_cookie: None,
            request_timeout_seconds: None,
        }
    }
}

impl UserConfig {
    /// ユーザー設定ファイルのパスを取得
    ///
    /// # Errors
    /// 設定ディレクトリが取得できない場合に ConfigError::DirectoryNotFound を返します。
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .ok_or_else(|| ConfigError::directory_not_found("Failed to get user config directory"))
            .map(|config_dir| config_dir.join("lecture-uploader").join("config.toml"))
    }

    /// ユーザー設定を読み込む
    ///
    /// 設定ファイルが存在しない場合はデフォルトから作成し、読み込み後に検証する（Fail Fast）。
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスからユーザー設定を読み込む
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::default().save_to(config_path)?;
            tracing::info!(path = %config_path.display(), "created default config file");
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to read config file: {}", config_path.display()),
                e,
            )
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::parse_error(
                format!("Failed to parse config file ({})", config_path.display()),
                e,
            )
        })?;

        config.validate()?;

        Ok(config)
    }

    /// ユーザー設定を保存する
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// 指定パスへ保存する。必要に応じて親ディレクトリを作成します。
    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::file_system(
                    format!("Failed to create config directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let body = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::serialize_error("Failed to serialize config", e))?;
        let content = format!(
            "# lecture-uploader - User Configuration\n\
             # Update with 'lecture-uploader configure --server <url> [--token <csrf>] [--cookie <session>]'\n\n{}",
            body
        );

        fs::write(config_path, content).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to write config file: {}", config_path.display()),
                e,
            )
        })?;

        Ok(())
    }

    /// ユーザー設定を検証
    ///
    /// # 検証内容
    /// - server_url: http/https の絶対URLであること
    /// - request_timeout_seconds: 指定する場合は1以上
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(self.server_url.trim()).map_err(|e| {
            ConfigError::validation_error(format!(
                "Invalid server_url '{}': {}",
                self.server_url, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::validation_error(format!(
                "server_url must use http or https, found '{}'",
                url.scheme()
            )));
        }

        if self.request_timeout_seconds == Some(0) {
            return Err(ConfigError::validation_error(
                "request_timeout_seconds must be at least 1 (remove it to disable timeouts)",
            ));
        }

        Ok(())
    }

    /// リクエストごとに送るCSRFトークン
    ///
    /// 環境変数 → 保存済みの値の順に参照し、どちらも無ければ空文字列。
    pub fn csrf_token(&self) -> String {
        std::env::var(CSRF_TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty())
            .or_else(|| self.csrf_token.clone())
            .unwrap_or_default()
    }

    /// トークンをマスキングして表示
    pub fn masked_csrf_token(&self) -> Option<String> {
        self.csrf_token.as_deref().map(mask_secret)
    }

    /// ベースURL（末尾のスラッシュは除去）
    pub fn base_url(&self) -> &str {
        self.server_url.trim().trim_end_matches('/')
    }
}

/// 先頭4文字と末尾4文字だけを残す。8文字以下は全て伏せる
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}

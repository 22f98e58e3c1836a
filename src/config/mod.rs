/// 設定管理モジュール
///
/// このモジュールは2層の設定構造を提供します:
/// 1. AppConfig - コンパイル時定数として定義される静的設定（APP_CONFIG）
/// 2. UserConfig - 実行時に読み込まれる動的設定（サーバーURL、トークン）
///
/// 両者から組み立てる `UploaderConfig` はアップロードコントローラに渡される。
///
/// ```rust,ignore
/// use crate::config::{APP_CONFIG, UserConfig};
///
/// let chunk_size = APP_CONFIG.upload.chunk_size;
/// let user_config = UserConfig::load()?;
/// let uploader_config = uploader_config(&user_config);
/// ```
pub mod app;
pub mod error;
pub mod user;

pub use app::{APP_CONFIG, BYTES_PER_MB};
pub use user::UserConfig;

use crate::domain::session::UploaderConfig;
use std::sync::Arc;
use std::time::Duration;

/// 静的設定とユーザー設定からコントローラ用の設定を組み立てる
///
/// トークンはリクエストのたびに `UserConfig::csrf_token` から読み直される。
pub fn uploader_config(user_config: &UserConfig) -> UploaderConfig {
    let tokens = user_config.clone();
    UploaderConfig {
        token_provider: Arc::new(move || tokens.csrf_token()),
        chunk_size: APP_CONFIG.upload.chunk_size,
        max_file_size: APP_CONFIG.upload.max_file_size,
        allowed_types: APP_CONFIG
            .upload
            .allowed_types
            .iter()
            .map(|t| t.to_string())
            .collect(),
        redirect_delay: Duration::from_millis(APP_CONFIG.upload.redirect_delay_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploader_config_from_user_config() {
        let user_config = UserConfig {
            csrf_token: Some("stored-token".to_string()),
            ..UserConfig::default()
        };

        let config = uploader_config(&user_config);

        assert_eq!(config.chunk_size, BYTES_PER_MB);
        assert_eq!(config.max_file_size, 500 * BYTES_PER_MB);
        assert!(config.allowed_types.contains("video/quicktime"));
        assert_eq!(config.redirect_delay, Duration::from_secs(2));
        // 環境変数が設定されていなければ保存済みトークン
        if std::env::var(user::CSRF_TOKEN_ENV).is_err() {
            assert_eq!((config.token_provider)(), "stored-token");
        }
    }
}

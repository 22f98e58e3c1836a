/// インフラ層のエラー定義
///
/// 講義サーバーとのHTTP通信で発生するエラー。
/// ドメイン層へは `TransportFailure`（サーバーの文言とステータスコード）として渡す。
use crate::domain::ports::TransportFailure;
use crate::error_severity::ErrorSeverity;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    /// ネットワークエラー
    #[error("network error: {message}")]
    Network { message: String },

    /// サーバーが非2xxを返した
    #[error("API error: {endpoint} - {message}")]
    Api {
        endpoint: String,
        message: String,
        status_code: Option<u16>,
    },

    /// タイムアウト（request_timeout_seconds を設定した場合のみ）
    #[error("operation timed out: {operation}")]
    Timeout { operation: String },

    /// 2xxだが応答の形式が想定と異なる
    #[error("unexpected response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// エラー応答の本文から表示用の文言を取り出す
///
/// JSONの `error` フィールドがあればそれを、無ければ本文そのまま、
/// 本文が空なら `fallback`。
pub fn server_error_message(body: &str, fallback: &str) -> String {
    if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str::<ErrorBody>(body) {
        if !error.is_empty() {
            return error;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

impl InfraError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn api(endpoint: impl Into<String>, message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            message: message.into(),
            status_code,
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// ドメイン層向けの失敗に変換する
    ///
    /// API エラーはサーバーの `error` 文言を優先し、その他は自身のメッセージを使う。
    pub fn into_failure(self, fallback: &str) -> TransportFailure {
        let status_code = self.status_code();
        let message = match &self {
            Self::Api { message, .. } => server_error_message(message, fallback),
            other => other.to_string(),
        };
        TransportFailure::new(message, status_code)
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Api {
                status_code: Some(401 | 403),
                ..
            } => ErrorSeverity::ConfigError,
            _ => ErrorSeverity::SystemError,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Api {
                status_code: Some(400 | 401 | 403),
                ..
            } => Some(
                "The server rejected the request. Update the CSRF token or session cookie with 'lecture-uploader configure'.",
            ),
            Self::Network { .. } => Some("Check the server_url setting and your network connection."),
            _ => None,
        }
    }
}

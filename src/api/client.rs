/// HTTPクライアント
///
/// 講義サーバーとの通信を担当するHTTPクライアント。
/// すべてのリクエストにCSRFトークンのヘッダーと（設定されていれば）セッションCookieを付与する。
/// タイムアウトは設定した場合のみ有効になる。
use crate::api::error::InfraError;
use crate::config::{APP_CONFIG, UserConfig};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, header};
use std::time::Duration;

/// APIクライアントの結果型
pub type ApiResult<T> = Result<T, InfraError>;

/// APIクライアント
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl ApiClient {
    /// 新しいAPIクライアントを作成
    ///
    /// # Arguments
    /// * `base_url` - サーバーのベースURL（例: "https://lectures.example.com"）
    /// * `timeout` - リクエスト単位のタイムアウト。None なら無制限
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| InfraError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_cookie: None,
        })
    }

    /// ユーザー設定からクライアントを作成
    pub fn from_user_config(config: &UserConfig) -> ApiResult<Self> {
        let timeout = config.request_timeout_seconds.map(Duration::from_secs);
        Ok(Self::new(config.base_url(), timeout)?.with_session_cookie(config.session_cookie.clone()))
    }

    /// セッションCookieを設定
    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// multipart/form-data でPOST
    pub async fn post_multipart(
        &self,
        endpoint: &str,
        form: Form,
        csrf_token: &str,
    ) -> ApiResult<Response> {
        let url = self.build_url(endpoint);
        let request = self.build_request(self.client.post(&url).multipart(form), csrf_token);

        Self::send_with_error_handling(request, endpoint, "POST").await
    }

    /// JSONボディでPOST
    pub async fn post_json<T: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &T,
        csrf_token: &str,
    ) -> ApiResult<Response> {
        let url = self.build_url(endpoint);
        let request = self.build_request(self.client.post(&url).json(body), csrf_token);

        Self::send_with_error_handling(request, endpoint, "POST").await
    }

    /// ボディなしでPOST
    pub async fn post_empty(&self, endpoint: &str, csrf_token: &str) -> ApiResult<Response> {
        let url = self.build_url(endpoint);
        let request = self.build_request(self.client.post(&url), csrf_token);

        Self::send_with_error_handling(request, endpoint, "POST").await
    }

    /// URLを構築
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// 共通ヘッダーを付与したリクエストを構築
    fn build_request(&self, request: RequestBuilder, csrf_token: &str) -> RequestBuilder {
        let mut request = request
            .header(APP_CONFIG.api.csrf_header, csrf_token)
            .header("X-Requested-With", "XMLHttpRequest");
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request
    }

    /// リクエストを送信し、エラーハンドリングを行う
    async fn send_with_error_handling(
        request: RequestBuilder,
        endpoint: &str,
        method: &str,
    ) -> ApiResult<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                InfraError::timeout(format!("{} {}", method, endpoint))
            } else if e.is_connect() {
                InfraError::network(format!(
                    "Connection failed for {} {}: {}",
                    method, endpoint, e
                ))
            } else {
                InfraError::network(format!("Request failed for {} {}: {}", method, endpoint, e))
            }
        })
    }

    /// レスポンスをチェックしてエラーを返す
    ///
    /// 非2xxの場合は本文をそのまま `InfraError::Api` の message に入れる。
    pub async fn check_response(response: Response, endpoint: &str) -> ApiResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        tracing::debug!(endpoint, status_code, body = %error_body, "request rejected");
        Err(InfraError::api(endpoint, error_body, Some(status_code)))
    }

    /// JSONレスポンスをデシリアライズ
    pub async fn parse_json<T: serde::de::DeserializeOwned>(
        response: Response,
        endpoint: &str,
    ) -> ApiResult<T> {
        response.json().await.map_err(|e| {
            InfraError::invalid_response(endpoint, format!("Failed to parse JSON response: {}", e))
        })
    }
}

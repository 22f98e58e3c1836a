/// 講義ページの付随操作
///
/// いいね切り替え、共有の記録、字幕生成と吹き替え生成のトリガー。
use crate::api::client::{ApiClient, ApiResult};
use crate::api::error::{InfraError, server_error_message};
use crate::api::types::{LikeResponse, ShareRequest, ShareResponse, TriggerResponse};
use crate::config::{APP_CONFIG, UserConfig};
use crate::domain::share::SharePlatform;
use url::form_urlencoded;

const SUBTITLE_FAILURE: &str = "Subtitle generation failed";
const DUB_FAILURE: &str = "Dubbing failed";

pub struct LectureActions {
    client: ApiClient,
    csrf_token: String,
}

impl LectureActions {
    pub fn new(client: ApiClient, csrf_token: impl Into<String>) -> Self {
        Self {
            client,
            csrf_token: csrf_token.into(),
        }
    }

    /// ユーザー設定（サーバーURL、トークン、Cookie）から作成
    pub fn from_user_config(config: &UserConfig) -> ApiResult<Self> {
        Ok(Self::new(
            ApiClient::from_user_config(config)?,
            config.csrf_token(),
        ))
    }

    fn lecture_endpoint(lecture_id: u64, action: &str) -> String {
        format!("{}/{}/{}", APP_CONFIG.api.lecture_prefix, lecture_id, action)
    }

    /// いいねを切り替える
    pub async fn toggle_like(&self, lecture_id: u64) -> ApiResult<LikeResponse> {
        let endpoint = Self::lecture_endpoint(lecture_id, "like");
        let response = self.client.post_empty(&endpoint, &self.csrf_token).await?;
        let response = ApiClient::check_response(response, &endpoint).await?;
        let body: LikeResponse = ApiClient::parse_json(response, &endpoint).await?;

        if !body.success {
            return Err(InfraError::api(&endpoint, "Like was not recorded", None));
        }
        tracing::debug!(lecture_id, liked = body.liked, likes = body.likes, "like toggled");
        Ok(body)
    }

    /// 共有を記録する
    ///
    /// サーバーが記録を受け付けた場合のみ Ok。
    pub async fn record_share(&self, lecture_id: u64, platform: SharePlatform) -> ApiResult<()> {
        let endpoint = Self::lecture_endpoint(lecture_id, "share");
        let request = ShareRequest {
            platform: platform.as_str(),
        };
        let response = self
            .client
            .post_json(&endpoint, &request, &self.csrf_token)
            .await?;
        let response = ApiClient::check_response(response, &endpoint).await?;
        let body: ShareResponse = ApiClient::parse_json(response, &endpoint).await?;

        if body.success {
            Ok(())
        } else {
            Err(InfraError::api(&endpoint, "Share was not recorded", None))
        }
    }

    /// 字幕生成を依頼する
    pub async fn generate_subtitles(&self, lecture_id: u64) -> ApiResult<TriggerResponse> {
        let endpoint = Self::lecture_endpoint(lecture_id, "generate_subtitles");
        self.trigger(&endpoint, SUBTITLE_FAILURE).await
    }

    /// 吹き替え生成を依頼する
    ///
    /// `language` を指定した場合はクエリ文字列で渡す。
    pub async fn generate_dub(
        &self,
        lecture_id: u64,
        language: Option<&str>,
    ) -> ApiResult<TriggerResponse> {
        let mut endpoint = Self::lecture_endpoint(lecture_id, "generate_dub");
        if let Some(language) = language {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .append_pair("language", language)
                .finish();
            endpoint = format!("{}?{}", endpoint, query);
        }
        self.trigger(&endpoint, DUB_FAILURE).await
    }

    async fn trigger(&self, endpoint: &str, failure: &str) -> ApiResult<TriggerResponse> {
        let response = self.client.post_empty(endpoint, &self.csrf_token).await?;
        let response = match ApiClient::check_response(response, endpoint).await {
            Ok(response) => response,
            Err(InfraError::Api {
                message,
                status_code,
                ..
            }) => {
                let detail = server_error_message(&message, "");
                let message = if detail.is_empty() {
                    failure.to_string()
                } else {
                    format!("{}: {}", failure, detail)
                };
                return Err(InfraError::api(endpoint, message, status_code));
            }
            Err(other) => return Err(other),
        };

        let body: TriggerResponse = ApiClient::parse_json(response, endpoint).await?;
        if !body.is_success() {
            let message = match &body.message {
                Some(detail) if !detail.is_empty() => format!("{}: {}", failure, detail),
                _ => failure.to_string(),
            };
            return Err(InfraError::api(endpoint, message, None));
        }
        Ok(body)
    }
}

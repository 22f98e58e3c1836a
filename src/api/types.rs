/// API通信用の型定義
///
/// 講義サーバーのJSON応答をデシリアライズするための構造体。
use crate::domain::ports::{ChunkAck, LectureCreated};
use serde::{Deserialize, Serialize};

/// チャンク受付エンドポイントの応答
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChunkResponse {
    /// 受理済み、組み立て継続中
    Progress {
        progress: f64,
        #[serde(default)]
        message: Option<String>,
    },
    /// 全チャンクの組み立て完了
    Complete { filename: String },
}

impl From<ChunkResponse> for ChunkAck {
    fn from(response: ChunkResponse) -> Self {
        match response {
            ChunkResponse::Progress { progress, message } => ChunkAck::Progress {
                percentage: progress,
                message,
            },
            ChunkResponse::Complete { filename } => ChunkAck::Complete { filename },
        }
    }
}

/// 講義作成エンドポイントの成功応答
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeResponse {
    pub message: String,
    pub redirect_url: String,
}

impl From<FinalizeResponse> for LectureCreated {
    fn from(response: FinalizeResponse) -> Self {
        LectureCreated {
            message: response.message,
            redirect_url: response.redirect_url,
        }
    }
}

/// いいね切り替えの応答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub success: bool,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub likes: u64,
}

/// 共有記録のリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct ShareRequest<'a> {
    pub platform: &'a str,
}

/// 共有記録の応答
#[derive(Debug, Clone, Deserialize)]
pub struct ShareResponse {
    pub success: bool,
}

/// 字幕・吹き替え生成の応答
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl TriggerResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

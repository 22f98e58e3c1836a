use serde::Serialize;
/// ドメイン層: アップロード進捗イベント定義
///
/// コントローラが処理の各段階で発行するイベント。
/// プレゼンテーション層はこれを受け取り、人間向けの表示や
/// 機械可読のJSON行に変換する。
use std::time::SystemTime;

/// アップロード処理の各段階を表すイベント
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum UploadPhase {
    /// ファイル選択・検証完了
    FileSelected {
        file_name: String,
        size_bytes: u64,
        display_size: String,
        mime_type: String,
    },

    /// チャンク送信開始
    UploadStarted {
        upload_id: String,
        file_name: String,
        total_chunks: u64,
    },

    /// チャンクがサーバーに受理された（status = progress）
    ChunkAccepted {
        chunk_number: u64,
        total_chunks: u64,
        percentage: f64,
        text: String,
    },

    /// 組み立て完了、講義作成中
    Finalizing { video_filename: String },

    /// 講義作成完了
    Completed {
        message: String,
        redirect_url: String,
    },
}

/// アップロード進捗情報
#[derive(Debug, Clone, Serialize)]
pub struct UploadProgress {
    /// 処理段階
    #[serde(flatten)]
    pub phase: UploadPhase,
    /// イベント発生時刻（JSON行ではRFC 3339文字列）
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: SystemTime,
}

impl UploadProgress {
    pub fn new(phase: UploadPhase) -> Self {
        Self {
            phase,
            timestamp: SystemTime::now(),
        }
    }
}

fn serialize_timestamp<S: serde::Serializer>(
    timestamp: &SystemTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let datetime: chrono::DateTime<chrono::Utc> = (*timestamp).into();
    serializer.serialize_str(&datetime.to_rfc3339())
}

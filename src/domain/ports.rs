/// ドメイン層が外部に要求するインターフェース
///
/// `LectureBackend` はチャンク受付と講義作成のリモート呼び出し、
/// `UploadView` はプレゼンテーション層（進捗表示・エラー表示・入力フォーム）。
/// 実装は api 層と presentation 層にあり、ドメイン層はそれらに依存しない。
use crate::domain::progress::UploadProgress;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// チャンク送信リクエスト
#[derive(Debug, Clone)]
pub struct ChunkUpload {
    pub upload_id: String,
    pub chunk_number: u64,
    pub total_chunks: u64,
    pub filename: String,
    pub data: Vec<u8>,
    pub csrf_token: String,
}

/// チャンク送信に対するサーバーの応答
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkAck {
    /// まだ組み立て中
    Progress {
        percentage: f64,
        message: Option<String>,
    },
    /// 組み立て完了。サーバー側のファイル名を返す
    Complete { filename: String },
}

/// 講義作成時に添付するサムネイル画像
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// 講義のメタデータ（呼び出し側の入力フォーム）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LectureForm {
    pub title: String,
    pub description: String,
    pub course_id: String,
    pub is_published: bool,
    pub thumbnail: Option<Thumbnail>,
}

/// 講義作成（finalize）リクエスト
#[derive(Debug, Clone)]
pub struct FinalizeRequest {
    pub form: LectureForm,
    pub video_filename: String,
    pub csrf_token: String,
}

/// 講義作成の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LectureCreated {
    pub message: String,
    pub redirect_url: String,
}

/// リモート呼び出しの失敗
///
/// `message` はサーバーの応答から取り出した最も具体的な文言。
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
    pub status_code: Option<u16>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

/// チャンク受付サービスと講義作成サービス
#[async_trait]
pub trait LectureBackend: Send + Sync {
    /// チャンクを1つ送信する
    async fn upload_chunk(&self, chunk: ChunkUpload) -> Result<ChunkAck, TransportFailure>;

    /// 組み立て済みファイルから講義を作成する
    async fn create_lecture(
        &self,
        request: FinalizeRequest,
    ) -> Result<LectureCreated, TransportFailure>;
}

/// アップロード画面
pub trait UploadView: Send + Sync {
    /// 進捗イベントを表示する
    fn report(&self, progress: &UploadProgress);

    /// エラーメッセージを表示する
    fn show_error(&self, message: &str);

    /// 入力コントロールの有効・無効を切り替える
    fn set_inputs_enabled(&self, enabled: bool);

    /// 講義作成の直前に呼ばれ、その時点のフォーム内容を返す
    fn lecture_form(&self) -> LectureForm;

    /// 作成された講義へ遷移する
    fn navigate(&self, redirect_url: &str);
}

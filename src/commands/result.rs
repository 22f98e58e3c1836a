/// コマンド実行結果を表す型
///
/// 各コマンドはこの型を返し、プレゼンテーション層（presentation::output）で
/// 人間向けと機械向けの出力フォーマットを決定する。
use serde::Serialize;

/// コマンド実行結果の統一型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Upload(UploadResult),
    Like(LikeResult),
    Share(ShareResult),
    Subtitles(TriggerResult),
    Dub(TriggerResult),
    Configure(ConfigureResult),
    Status(StatusResult),
    Help,
}

/// アップロードコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    /// セッションのアップロードID
    pub upload_id: String,
    /// サーバーの成功メッセージ
    pub message: String,
    /// 作成された講義ページ（絶対URL）
    pub redirect_url: String,
    /// ファイルパス
    pub file_path: String,
    /// ファイルサイズ（bytes）
    pub file_size: u64,
    /// 表示用のファイルサイズ
    pub display_size: String,
    /// MIMEタイプ
    pub mime_type: String,
    /// チャンクサイズ（bytes）
    pub chunk_size: u64,
    /// 送信予定だったチャンク数
    pub total_chunks: u64,
    /// 完了時刻（RFC 3339）
    pub completed_at: String,
}

/// いいねコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct LikeResult {
    pub lecture_id: u64,
    pub liked: bool,
    pub likes: u64,
}

/// 共有コマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct ShareResult {
    pub lecture_id: u64,
    pub platform: String,
    /// 共有先の外部URL
    pub share_url: String,
}

/// 字幕・吹き替えコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct TriggerResult {
    pub lecture_id: u64,
    /// 吹き替えの対象言語（指定時のみ）
    pub language: Option<String>,
    /// サーバーからの補足メッセージ
    pub message: Option<String>,
}

/// 設定コマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct ConfigureResult {
    pub config_path: String,
    pub server_url: String,
    /// CSRFトークンを更新したか
    pub token_updated: bool,
    /// セッションCookieを更新したか
    pub cookie_updated: bool,
}

/// ステータスコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    pub config_path: String,
    pub server_url: String,
    /// マスキングされたCSRFトークン
    pub csrf_token: Option<String>,
    /// トークンの取得元（"environment" / "config"）
    pub token_source: Option<String>,
    pub has_session_cookie: bool,
    pub request_timeout_seconds: Option<u64>,
}

impl CommandResult {
    /// 成功メッセージを取得（人間向け出力用）
    pub fn success_message(&self) -> String {
        match self {
            CommandResult::Upload(r) => r.message.clone(),
            CommandResult::Like(r) => {
                if r.liked {
                    "Lecture liked.".to_string()
                } else {
                    "Like removed.".to_string()
                }
            }
            CommandResult::Share(_) => "Share recorded.".to_string(),
            CommandResult::Subtitles(_) => "Subtitle generation started.".to_string(),
            CommandResult::Dub(_) => "Dubbing started.".to_string(),
            CommandResult::Configure(_) => "Configuration saved.".to_string(),
            CommandResult::Status(r) => {
                if r.token_source.is_some() {
                    "Configured".to_string()
                } else {
                    "No CSRF token configured".to_string()
                }
            }
            CommandResult::Help => "".to_string(),
        }
    }
}

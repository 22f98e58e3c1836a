/// ドメイン層のエラー定義
///
/// `DomainError` はファイル選択時の検証エラー（ネットワークには到達しない）、
/// `UploadError` は送信開始後にセッションを Failed にするエラー。
/// 外部クレートのエラー型は含めず、サーバーの応答はメッセージ文字列として保持する。
use crate::error_severity::ErrorSeverity;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// ファイルが見つからない
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// ディレクトリが指定された
    #[error("'{path}' is a directory, not a file")]
    NotAFile { path: String },

    /// 空のファイル
    #[error("file is empty: {name}")]
    EmptyFile { name: String },

    /// 許可されていないMIMEタイプ
    #[error("invalid file type: {name} is {found} (expected one of: {expected})")]
    InvalidType {
        name: String,
        expected: String,
        found: String,
    },

    /// ファイルサイズが上限を超過
    #[error("file too large: {size} bytes (maximum allowed: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// 未対応の共有先
    #[error("unknown share platform: {platform}")]
    UnknownPlatform { platform: String },
}

impl DomainError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    pub fn invalid_type<S: AsRef<str>>(
        name: impl Into<String>,
        allowed: impl IntoIterator<Item = S>,
        found: impl Into<String>,
    ) -> Self {
        let mut expected: Vec<String> = allowed.into_iter().map(|s| s.as_ref().to_string()).collect();
        expected.sort();
        Self::InvalidType {
            name: name.into(),
            expected: expected.join(", "),
            found: found.into(),
        }
    }

    /// 画面に出すメッセージ
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidType { .. } => {
                "Please select a valid video file (MP4, WebM, OGG, MOV, AVI, MKV)".to_string()
            }
            Self::TooLarge { max, .. } => {
                format!("File size must be less than {}MB", max / (1024 * 1024))
            }
            other => other.to_string(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::UserError
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::FileNotFound { .. } => {
                Some("Please check the file path and ensure the file exists.")
            }
            Self::NotAFile { .. } => Some("Please specify a file, not a directory."),
            Self::EmptyFile { .. } => Some("The file appears to be empty or corrupted."),
            Self::InvalidType { .. } => Some(
                "Supported formats: mp4, webm, ogg, mov, avi, mkv. Use --mime to override detection.",
            ),
            Self::TooLarge { .. } => Some("Try compressing the video or use a smaller file."),
            Self::UnknownPlatform { .. } => Some("Supported platforms: email, whatsapp, facebook, twitter"),
        }
    }
}

/// 送信開始後の失敗。いずれもセッションを Failed にする
#[derive(Error, Debug)]
pub enum UploadError {
    /// チャンク送信の失敗（非2xx応答または通信例外）
    #[error("chunk {chunk_number} upload failed: {message}")]
    ChunkTransport {
        chunk_number: u64,
        message: String,
        status_code: Option<u16>,
    },

    /// 送信元ファイルの読み込み失敗
    #[error("failed to read chunk {chunk_number} from source file")]
    SourceRead {
        chunk_number: u64,
        #[source]
        source: io::Error,
    },

    /// 全チャンクを送ったがサーバーが complete を返さなかった
    #[error("server did not report completion after {chunks_sent} chunks")]
    AssemblyIncomplete { chunks_sent: u64 },

    /// 講義作成（finalize）の失敗
    #[error("failed to create lecture: {message}")]
    Finalize {
        message: String,
        status_code: Option<u16>,
    },
}

impl UploadError {
    /// 画面に出すメッセージ（サーバーの文言を優先）
    pub fn user_message(&self) -> String {
        match self {
            Self::ChunkTransport { message, .. } => format!("Upload failed: {}", message),
            Self::SourceRead { source, .. } => format!("Upload failed: {}", source),
            Self::AssemblyIncomplete { .. } => {
                "Upload failed: server did not confirm the upload".to_string()
            }
            Self::Finalize { message, .. } => format!("Upload failed: {}", message),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceRead { .. } => ErrorSeverity::UserError,
            _ => ErrorSeverity::SystemError,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::ChunkTransport {
                status_code: Some(400..=499),
                ..
            }
            | Self::Finalize {
                status_code: Some(400..=499),
                ..
            } => Some(
                "The server rejected the request. Check the CSRF token and session cookie with 'lecture-uploader status'.",
            ),
            Self::ChunkTransport { .. } | Self::AssemblyIncomplete { .. } => {
                Some("Partially uploaded chunks are discarded. Run the upload again to start over.")
            }
            _ => None,
        }
    }
}

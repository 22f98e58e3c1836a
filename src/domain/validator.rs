/// ドメインサービス: ファイルバリデーション
///
/// 選択されたファイルを検証し、検証済みのアップロードセッションを作る。
/// 検証エラーはネットワークに到達する前に返される。
use crate::domain::error::DomainError;
use crate::domain::session::{SelectedFile, UploadSession, UploaderConfig};
use crate::domain::source::FileSource;
use std::path::Path;

/// 拡張子 → MIMEタイプ
const MIME_BY_EXTENSION: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("ogg", "video/ogg"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

const FALLBACK_MIME: &str = "application/octet-stream";

/// 拡張子からMIMEタイプを推定する（大文字小文字は区別しない）
pub fn detect_mime_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| {
            MIME_BY_EXTENSION
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(FALLBACK_MIME)
}

/// ディスク上のファイルを選択対象として読み取る
///
/// `mime_override` が指定されていれば拡張子からの推定より優先する。
///
/// # エラー
/// - ファイルが存在しない
/// - ディレクトリが指定された
pub fn inspect_file(file_path: &str, mime_override: Option<&str>) -> Result<SelectedFile, DomainError> {
    let path = Path::new(file_path);

    if !path.exists() {
        return Err(DomainError::file_not_found(file_path));
    }

    let metadata = std::fs::metadata(path).map_err(|_| DomainError::file_not_found(file_path))?;

    if metadata.is_dir() {
        return Err(DomainError::not_a_file(file_path));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());

    let mime_type = mime_override
        .map(str::to_string)
        .unwrap_or_else(|| detect_mime_type(path).to_string());

    Ok(SelectedFile {
        name,
        mime_type,
        size: metadata.len(),
        source: FileSource::Disk(path.to_path_buf()),
    })
}

/// メモリ上のバイト列を選択対象にする（stdin からの入力用）
///
/// MIMEタイプは `name` の拡張子から推定する。
pub fn inspect_bytes(name: &str, bytes: Vec<u8>, mime_override: Option<&str>) -> SelectedFile {
    let mime_type = mime_override
        .map(str::to_string)
        .unwrap_or_else(|| detect_mime_type(Path::new(name)).to_string());

    SelectedFile {
        name: name.to_string(),
        mime_type,
        size: bytes.len() as u64,
        source: FileSource::memory(bytes),
    }
}

/// 選択されたファイルを検証し、Validated 状態のセッションを返す
///
/// # エラー
/// - 許可されていないMIMEタイプ → `InvalidType`
/// - 上限を超えるサイズ → `TooLarge`
/// - 0バイト → `EmptyFile`
pub fn validate_selection(
    file: SelectedFile,
    config: &UploaderConfig,
) -> Result<UploadSession, DomainError> {
    if !config.allowed_types.contains(&file.mime_type) {
        return Err(DomainError::invalid_type(
            &file.name,
            &config.allowed_types,
            &file.mime_type,
        ));
    }

    if file.size > config.max_file_size {
        return Err(DomainError::TooLarge {
            size: file.size,
            max: config.max_file_size,
        });
    }

    if file.size == 0 {
        return Err(DomainError::EmptyFile { name: file.name });
    }

    Ok(UploadSession::validated(file, config.chunk_size))
}

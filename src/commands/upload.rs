use crate::api::client::ApiClient;
use crate::api::lecture::HttpLectureBackend;
use crate::commands::result::{CommandResult, UploadResult};
use crate::config::{APP_CONFIG, UserConfig, uploader_config};
use crate::domain::controller::{SubmitOutcome, UploadController};
use crate::domain::ports::{LectureForm, Thumbnail};
use crate::domain::validator;
use crate::presentation::input;
use crate::presentation::view::ConsoleView;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// このパスが指定された場合は stdin から動画を読む
pub const STDIN_PATH: &str = "-";

/// アップロードコマンドの引数
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub file_path: String,
    pub title: String,
    pub course_id: u64,
    pub description: String,
    pub publish: bool,
    pub thumbnail_path: Option<String>,
    pub mime_override: Option<String>,
    /// stdin から読む場合のファイル名（`--name`）
    pub stdin_name: Option<String>,
    pub show_progress: bool,
}

/// アップロードコマンドを実行する
///
/// # 引数
/// * `options` - 対象ファイルと講義フォームの内容
/// * `machine_output` - 進捗をJSON行で出力するか
///
/// # エラー
/// このレイヤーでは anyhow::Result を返し、
/// ドメイン層・インフラ層のエラーを集約する。
pub async fn execute(options: UploadOptions, machine_output: bool) -> Result<CommandResult> {
    // ユーザー設定を読み込み（自動検証される）
    let user_config = UserConfig::load()
        .context("Failed to load user configuration. Please check your config.toml file.")?;

    run(&user_config, options, machine_output).await
}

async fn run(
    user_config: &UserConfig,
    options: UploadOptions,
    machine_output: bool,
) -> Result<CommandResult> {
    if user_config.csrf_token().is_empty() {
        tracing::warn!("no CSRF token configured; the server will likely reject the upload");
    }

    // ドメイン層のバリデーション前にファイル自体を確認
    // DomainError は自動的に anyhow::Error に変換される
    let file = if options.file_path == STDIN_PATH {
        let name = options
            .stdin_name
            .as_deref()
            .context("Please specify a file name with --name when reading the video from stdin")?;
        let bytes = input::read_video_from_stdin(APP_CONFIG.upload.max_file_size)
            .await
            .context("File validation failed")?;
        validator::inspect_bytes(name, bytes, options.mime_override.as_deref())
    } else {
        validator::inspect_file(&options.file_path, options.mime_override.as_deref())
            .context("File validation failed")?
    };

    let form = build_form(&options).await?;

    let client = ApiClient::from_user_config(user_config)
        .context("Failed to initialize API client")?;
    let view = ConsoleView::new(
        form,
        client.base_url(),
        options.show_progress,
        machine_output,
    );
    let controller = UploadController::new(
        HttpLectureBackend::new(client),
        view,
        uploader_config(user_config),
    );

    let summary = controller
        .select_file(file)
        .context("File validation failed")?
        .context("File selection was not accepted")?;

    let outcome = controller.submit().await.context("Upload failed")?;
    tracing::debug!(status = ?controller.status(), "upload session finished");

    let created = match outcome {
        SubmitOutcome::Succeeded(created) => created,
        SubmitOutcome::Ignored(reason) => bail!("Upload did not start ({:?})", reason),
    };

    let redirect_url = controller
        .view()
        .redirect_target()
        .unwrap_or_else(|| created.redirect_url.clone());

    Ok(CommandResult::Upload(UploadResult {
        upload_id: summary.upload_id,
        message: created.message,
        redirect_url,
        file_path: options.file_path,
        file_size: summary.size_bytes,
        display_size: summary.display_size,
        mime_type: summary.mime_type,
        chunk_size: summary.chunk_size,
        total_chunks: summary.total_chunks,
        completed_at: chrono::Local::now().to_rfc3339(),
    }))
}

/// 講義フォームを組み立てる（サムネイルがあれば読み込む）
async fn build_form(options: &UploadOptions) -> Result<LectureForm> {
    let thumbnail = match &options.thumbnail_path {
        Some(path) => Some(read_thumbnail(Path::new(path)).await?),
        None => None,
    };

    Ok(LectureForm {
        title: options.title.clone(),
        description: options.description.clone(),
        course_id: options.course_id.to_string(),
        is_published: options.publish,
        thumbnail,
    })
}

async fn read_thumbnail(path: &Path) -> Result<Thumbnail> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read thumbnail: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "thumbnail".to_string());

    Ok(Thumbnail {
        mime_type: image_mime_type(path).to_string(),
        file_name,
        data,
    })
}

fn image_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// ドメインモデル: アップロードセッション
///
/// 1つのファイルを選択から講義作成まで追跡する状態。
/// upload_id はセッション生成時に一度だけ割り当てられ、途中で変わることはない。
/// 失敗したセッションは再開できず、再送信は新しいセッション（新しいID）で行う。
use crate::domain::source::FileSource;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// CSRFトークンの取得元。リクエストごとに呼ばれる
pub type TokenProvider = Arc<dyn Fn() -> String + Send + Sync>;

/// コントローラの構築時に渡す設定
#[derive(Clone)]
pub struct UploaderConfig {
    pub token_provider: TokenProvider,
    pub chunk_size: u64,
    pub max_file_size: u64,
    pub allowed_types: BTreeSet<String>,
    /// 成功メッセージ表示からリダイレクトまでの待ち時間
    pub redirect_delay: Duration,
}

impl UploaderConfig {
    pub fn csrf_token(&self) -> String {
        (self.token_provider)()
    }
}

impl fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("chunk_size", &self.chunk_size)
            .field("max_file_size", &self.max_file_size)
            .field("allowed_types", &self.allowed_types)
            .field("redirect_delay", &self.redirect_delay)
            .finish_non_exhaustive()
    }
}

/// 呼び出し側が選択したファイル
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub source: FileSource,
}

/// セッションの状態
///
/// Idle → Validated → Uploading → Finalizing → Succeeded の一方向のみ。
/// Uploading / Finalizing からは Failed に遷移でき、Failed は終端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Idle,
    Validated,
    Uploading,
    Finalizing,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn can_transition_to(self, next: UploadStatus) -> bool {
        use UploadStatus::*;
        matches!(
            (self, next),
            (Idle, Validated)
                | (Validated, Uploading)
                | (Uploading, Finalizing)
                | (Uploading, Failed)
                | (Finalizing, Succeeded)
                | (Finalizing, Failed)
        )
    }
}

/// ファイルをチャンクに分割する計画
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    file_size: u64,
    chunk_size: u64,
}

impl ChunkPlan {
    /// # Panics
    /// `chunk_size` が 0 の場合
    pub fn new(file_size: u64, chunk_size: u64) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        Self {
            file_size,
            chunk_size,
        }
    }

    /// ceil(file_size / chunk_size)
    pub fn total_chunks(&self) -> u64 {
        self.file_size.div_ceil(self.chunk_size)
    }

    /// `chunk_number` 番目のチャンクのバイト範囲。範囲外なら None
    pub fn range(&self, chunk_number: u64) -> Option<Range<u64>> {
        if chunk_number >= self.total_chunks() {
            return None;
        }
        let start = chunk_number * self.chunk_size;
        let end = (start + self.chunk_size).min(self.file_size);
        Some(start..end)
    }
}

/// 衝突しにくいアップロードIDを生成する（UUID v4）
pub fn generate_upload_id() -> String {
    format!("upload_{}", Uuid::new_v4().simple())
}

/// 1ファイル分のアップロードセッション
#[derive(Debug, Clone)]
pub struct UploadSession {
    file: SelectedFile,
    upload_id: String,
    plan: ChunkPlan,
    status: UploadStatus,
    next_chunk: u64,
}

impl UploadSession {
    /// 検証済みのファイルからセッションを作る（状態は Validated）
    pub(crate) fn validated(file: SelectedFile, chunk_size: u64) -> Self {
        let plan = ChunkPlan::new(file.size, chunk_size);
        let mut session = Self {
            file,
            upload_id: generate_upload_id(),
            plan,
            status: UploadStatus::Idle,
            next_chunk: 0,
        };
        session.transition(UploadStatus::Validated);
        session
    }

    /// 同じファイルで新しいセッションを作り直す（新しい upload_id）
    pub fn restart(&self) -> Self {
        Self::validated(self.file.clone(), self.plan.chunk_size)
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    pub fn chunk_size(&self) -> u64 {
        self.plan.chunk_size
    }

    pub fn total_chunks(&self) -> u64 {
        self.plan.total_chunks()
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// 次に送るチャンク番号
    pub fn current_chunk_index(&self) -> u64 {
        self.next_chunk
    }

    /// 状態を進める
    ///
    /// 不正な遷移はプログラムの誤りなので debug ビルドでは panic する。
    pub(crate) fn transition(&mut self, next: UploadStatus) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal status transition {:?} -> {:?}",
            self.status,
            next
        );
        tracing::debug!(
            upload_id = %self.upload_id,
            from = ?self.status,
            to = ?next,
            "session status changed"
        );
        self.status = next;
    }

    /// 次のチャンクを取り出し、カーソルを1つ進める
    pub(crate) fn take_next_chunk(&mut self) -> Option<(u64, Range<u64>)> {
        let chunk_number = self.next_chunk;
        let range = self.plan.range(chunk_number)?;
        self.next_chunk += 1;
        Some((chunk_number, range))
    }
}

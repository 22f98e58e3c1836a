/// プレゼンテーション層: アップロード進捗表示DTO
///
/// ドメイン層の`UploadProgress`をUI表示に適した形式に変換します。
///
/// # 設計方針
/// - `From<&UploadProgress>`で借用による変換（所有権を奪わない）
/// - `Option<DisplayProgress>`で表示抑制を明示的に表現
/// - ヘルパー関数で各フェーズの変換ロジックを分離
use crate::domain::progress::{UploadPhase, UploadProgress};

/// 進捗表示のカテゴリ
///
/// UIでの表示方法を決定するためのメタ情報
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressCategory {
    /// ファイル選択・検証
    Selection,
    /// チャンク送信中
    Upload,
    /// 講義作成中
    Finalizing,
    /// 完了
    Completed,
}

/// プレゼンテーション層用の進捗情報
#[derive(Debug, Clone)]
pub struct DisplayProgress {
    /// 表示用メッセージ
    pub message: String,
    /// 進捗カテゴリ
    pub category: ProgressCategory,
    /// プログレスバーの幅（0-100）
    pub bar_percent: Option<f64>,
}

impl DisplayProgress {
    pub fn new(message: String, category: ProgressCategory) -> Self {
        Self {
            message,
            category,
            bar_percent: None,
        }
    }

    pub fn with_bar(mut self, percent: f64) -> Self {
        self.bar_percent = Some(percent.clamp(0.0, 100.0));
        self
    }

    /// 1行の表示文字列
    pub fn render(&self) -> String {
        match self.bar_percent {
            Some(percent) => format!("{} {}", render_bar(percent), self.message),
            None => self.message.clone(),
        }
    }
}

/// ドメイン層の`UploadProgress`から`DisplayProgress`への変換
///
/// # 戻り値
/// - `Some(DisplayProgress)`: 表示すべき進捗情報
/// - `None`: 表示を抑制（最終チャンク以外で、前回から進捗が変わらない更新など）
impl From<&UploadProgress> for Option<DisplayProgress> {
    fn from(progress: &UploadProgress) -> Self {
        match &progress.phase {
            UploadPhase::FileSelected {
                file_name,
                display_size,
                mime_type,
                ..
            } => Some(format_file_selected(file_name, display_size, mime_type)),
            UploadPhase::UploadStarted {
                file_name,
                total_chunks,
                ..
            } => Some(format_upload_started(file_name, *total_chunks)),
            UploadPhase::ChunkAccepted {
                chunk_number,
                total_chunks,
                percentage,
                text,
            } => format_chunk_accepted(*chunk_number, *total_chunks, *percentage, text),
            UploadPhase::Finalizing { .. } => Some(DisplayProgress::new(
                "Creating lecture...".to_string(),
                ProgressCategory::Finalizing,
            )),
            UploadPhase::Completed { message, .. } => Some(DisplayProgress::new(
                message.clone(),
                ProgressCategory::Completed,
            )),
        }
    }
}

// ============================================================================
// ヘルパー関数: 各フェーズの変換ロジック
// ============================================================================

fn format_file_selected(file_name: &str, display_size: &str, mime_type: &str) -> DisplayProgress {
    DisplayProgress::new(
        format!("Selected: {} ({}, {})", file_name, display_size, mime_type),
        ProgressCategory::Selection,
    )
}

fn format_upload_started(file_name: &str, total_chunks: u64) -> DisplayProgress {
    DisplayProgress::new(
        format!("Uploading {} in {} chunk(s)...", file_name, total_chunks),
        ProgressCategory::Upload,
    )
    .with_bar(0.0)
}

/// チャンク受理の表示
///
/// 大きなファイルでは数百チャンクになるため、10チャンクごとと最後の1つだけ表示する。
fn format_chunk_accepted(
    chunk_number: u64,
    total_chunks: u64,
    percentage: f64,
    text: &str,
) -> Option<DisplayProgress> {
    let sent = chunk_number + 1;
    if sent % 10 != 0 && sent != total_chunks && total_chunks > 10 {
        return None;
    }
    Some(
        DisplayProgress::new(
            format!("{} ({}/{})", text, sent, total_chunks),
            ProgressCategory::Upload,
        )
        .with_bar(percentage),
    )
}

const BAR_WIDTH: usize = 30;

fn render_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(phase: UploadPhase) -> Option<DisplayProgress> {
        Option::<DisplayProgress>::from(&UploadProgress::new(phase))
    }

    #[test]
    fn test_file_selected() {
        let progress = display(UploadPhase::FileSelected {
            file_name: "week1.mp4".to_string(),
            size_bytes: 1536,
            display_size: "1.5 KB".to_string(),
            mime_type: "video/mp4".to_string(),
        })
        .expect("update should be displayed");

        assert_eq!(progress.message, "Selected: week1.mp4 (1.5 KB, video/mp4)");
        assert_eq!(progress.category, ProgressCategory::Selection);
        assert!(progress.bar_percent.is_none());
    }

    #[test]
    fn test_chunk_accepted_small_upload_always_shown() {
        let progress = display(UploadPhase::ChunkAccepted {
            chunk_number: 1,
            total_chunks: 4,
            percentage: 50.0,
            text: "50% uploaded".to_string(),
        })
        .expect("update should be displayed");

        assert_eq!(progress.message, "50% uploaded (2/4)");
        assert_eq!(progress.bar_percent, Some(50.0));
    }

    #[test]
    fn test_chunk_accepted_large_upload_is_thinned() {
        let shown = |chunk_number| {
            display(UploadPhase::ChunkAccepted {
                chunk_number,
                total_chunks: 25,
                percentage: 10.0,
                text: "10% uploaded".to_string(),
            })
            .is_some()
        };

        assert!(!shown(0));
        assert!(shown(9));
        assert!(!shown(10));
        assert!(shown(24));
    }

    #[test]
    fn test_render_bar() {
        let progress = DisplayProgress::new("half".to_string(), ProgressCategory::Upload).with_bar(50.0);
        assert_eq!(
            progress.render(),
            format!("[{}{}] half", "#".repeat(15), "-".repeat(15))
        );

        let over = DisplayProgress::new("x".to_string(), ProgressCategory::Upload).with_bar(140.0);
        assert_eq!(over.bar_percent, Some(100.0));
    }

    #[test]
    fn test_completed_uses_server_message() {
        let progress = display(UploadPhase::Completed {
            message: "Lecture uploaded successfully!".to_string(),
            redirect_url: "/instructor/courses/1".to_string(),
        })
        .expect("update should be displayed");

        assert_eq!(progress.message, "Lecture uploaded successfully!");
        assert_eq!(progress.category, ProgressCategory::Completed);
    }
}

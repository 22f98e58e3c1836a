/// 共有コマンド
///
/// 共有をサーバーに記録し、共有先プラットフォームのURLを生成します。
/// サーバーが記録を拒否した場合はURLを生成しません。
use crate::api::actions::LectureActions;
use crate::commands::result::{CommandResult, ShareResult};
use crate::config::user::UserConfig;
use crate::domain::share::{SharePlatform, share_link};
use anyhow::{Context, Result};

/// 共有コマンドの引数
#[derive(Debug, Clone)]
pub struct ShareOptions {
    pub lecture_id: u64,
    pub platform: SharePlatform,
    /// 共有する講義ページのURL
    pub lecture_url: String,
    /// 講義タイトル（未指定なら "Lecture"）
    pub title: Option<String>,
}

/// 共有コマンドを実行
pub async fn execute(options: ShareOptions) -> Result<CommandResult> {
    let config = UserConfig::load().context("Failed to load configuration file")?;
    let actions =
        LectureActions::from_user_config(&config).context("Failed to initialize API client")?;

    actions
        .record_share(options.lecture_id, options.platform)
        .await
        .with_context(|| format!("Failed to record share for lecture {}", options.lecture_id))?;

    let title = options.title.as_deref().unwrap_or("Lecture");
    let share_url = share_link(options.platform, title, &options.lecture_url);

    Ok(CommandResult::Share(ShareResult {
        lecture_id: options.lecture_id,
        platform: options.platform.to_string(),
        share_url,
    }))
}

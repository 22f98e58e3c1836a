/// 字幕生成コマンド
use crate::api::actions::LectureActions;
use crate::commands::result::{CommandResult, TriggerResult};
use crate::config::user::UserConfig;
use anyhow::{Context, Result};

/// 字幕生成コマンドを実行
///
/// # Arguments
/// * `lecture_id` - 講義ID
pub async fn execute(lecture_id: u64) -> Result<CommandResult> {
    let config = UserConfig::load().context("Failed to load configuration file")?;
    let actions =
        LectureActions::from_user_config(&config).context("Failed to initialize API client")?;

    let response = actions
        .generate_subtitles(lecture_id)
        .await
        .with_context(|| format!("Subtitle generation failed for lecture {}", lecture_id))?;

    Ok(CommandResult::Subtitles(TriggerResult {
        lecture_id,
        language: None,
        message: response.message,
    }))
}

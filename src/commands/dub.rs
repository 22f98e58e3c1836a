/// 吹き替え生成コマンド
use crate::api::actions::LectureActions;
use crate::commands::result::{CommandResult, TriggerResult};
use crate::config::user::UserConfig;
use anyhow::{Context, Result};

/// 吹き替え生成コマンドを実行
///
/// # Arguments
/// * `lecture_id` - 講義ID
/// * `language` - 対象言語（未指定ならサーバー側の既定値）
pub async fn execute(lecture_id: u64, language: Option<String>) -> Result<CommandResult> {
    let config = UserConfig::load().context("Failed to load configuration file")?;
    let actions =
        LectureActions::from_user_config(&config).context("Failed to initialize API client")?;

    let response = actions
        .generate_dub(lecture_id, language.as_deref())
        .await
        .with_context(|| format!("Dubbing failed for lecture {}", lecture_id))?;

    Ok(CommandResult::Dub(TriggerResult {
        lecture_id,
        language,
        message: response.message,
    }))
}

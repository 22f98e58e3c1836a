/// いいねコマンド
///
/// 講義のいいねを切り替え、切り替え後の状態といいね数を返します。
use crate::api::actions::LectureActions;
use crate::commands::result::{CommandResult, LikeResult};
use crate::config::user::UserConfig;
use anyhow::{Context, Result};

/// いいねコマンドを実行
///
/// # Arguments
/// * `lecture_id` - 講義ID
pub async fn execute(lecture_id: u64) -> Result<CommandResult> {
    let config = UserConfig::load().context("Failed to load configuration file")?;
    let actions =
        LectureActions::from_user_config(&config).context("Failed to initialize API client")?;

    let like = actions
        .toggle_like(lecture_id)
        .await
        .with_context(|| format!("Failed to toggle like for lecture {}", lecture_id))?;

    Ok(CommandResult::Like(LikeResult {
        lecture_id,
        liked: like.liked,
        likes: like.likes,
    }))
}

/// ヘルプコマンド
///
/// 表示内容は `presentation::output::HELP_TEXT` に一元化されている。
use crate::commands::result::CommandResult;

pub fn execute() -> CommandResult {
    tracing::debug!("help requested");
    CommandResult::Help
}

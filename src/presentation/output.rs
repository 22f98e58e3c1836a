/// プレゼンテーション層: コマンド結果の出力
///
/// コマンド実行結果をユーザー向け（人間可読）または
/// 機械向け（JSON）形式で出力する責務を担います。
/// CLI使用方法とエラーの表示もこのモジュールが担当します。
use crate::commands::result::CommandResult;
use crate::error_severity::ErrorSeverity;
use anyhow::Result;
use serde::Serialize;

/// ヘルプテキスト（単一の情報源）
const HELP_TEXT: &str = "lecture-uploader
Upload lecture videos to the course server in chunks from the command line

Usage:
  lecture-uploader [--machine] <command> [args...]

Global Flags:
  --machine        - Output machine-readable JSON to stdout (for scripting)
                     Works for both success and error cases

Available commands:
  upload <file> --title <title> --course-id <id> [options]
                   - Upload a video and create a lecture
                     --description <text>: Lecture description
                     --publish: Publish the lecture immediately
                     --thumbnail <image>: Attach a thumbnail image
                     --mime <type>: Override the detected video type
                     --name <file>: File name when <file> is '-' (read from stdin)
                     --progress: Show upload progress
  like <lecture_id>
                   - Toggle your like on a lecture
  share <lecture_id> <platform> --url <lecture_url> [--title <title>]
                   - Record a share and print the share link
                     Platforms: email, whatsapp, facebook, twitter
  subtitles <lecture_id>
                   - Start subtitle generation for a lecture
  dub <lecture_id> [--language <code>]
                   - Start dubbing for a lecture
  configure [--server <url>] [--token <csrf> | --token-stdin] [--cookie <cookie>] [--timeout <secs>]
                   - Save connection settings (--timeout 0 removes the limit)
  status           - Show the current connection settings
  help             - Display this help message

Environment:
  LECTURE_UPLOADER_CSRF_TOKEN    - CSRF token (overrides the stored token)
  RUST_LOG                       - Log filter for diagnostics on stderr (default: warn)

Error Output:
  Normal mode:   Human-readable error messages to stderr
  --machine:     JSON error object with exit_code and hint fields

Progress Output:
  upload --progress              - Show human-readable progress to stderr
  --machine upload --progress    - Output JSON progress events to stdout, one per line";

/// コマンド結果を適切な形式で出力する
///
/// # Output
/// * `machine_output = false`: 人間向けの詳細メッセージ（stderr）
/// * `machine_output = true`: 機械可読JSON（stdout）
pub fn output_result(result: &CommandResult, machine_output: bool) -> Result<()> {
    if machine_output {
        println!("{}", machine_readable(result)?);
    } else {
        output_human_readable(result);
    }

    Ok(())
}

/// 人間向けの詳細メッセージを出力（stderr）
///
/// すべての出力はstderrに送られ、stdoutはパイプライン用に予約されます。
fn output_human_readable(result: &CommandResult) {
    match result {
        CommandResult::Upload(r) => {
            eprintln!();
            eprintln!("✓ {}", r.message);
            eprintln!("---");
            eprintln!("File:       {} ({})", r.file_path, r.display_size);
            eprintln!("Type:       {}", r.mime_type);
            eprintln!("Chunks:     {}", r.total_chunks);
            eprintln!("Upload ID:  {}", r.upload_id);
            eprintln!();
            eprintln!("Lecture page:");
            eprintln!("{}", r.redirect_url);
            eprintln!("---");
        }
        CommandResult::Like(r) => {
            eprintln!("{}", result.success_message());
            eprintln!("Lecture {} now has {} like(s).", r.lecture_id, r.likes);
        }
        CommandResult::Share(r) => {
            eprintln!("{}", result.success_message());
            eprintln!("Open this link to share on {}:", r.platform);
            eprintln!("{}", r.share_url);
        }
        CommandResult::Subtitles(r) | CommandResult::Dub(r) => {
            eprintln!("✓ {}", result.success_message());
            if let Some(language) = &r.language {
                eprintln!("Language: {}", language);
            }
            if let Some(message) = &r.message {
                eprintln!("{}", message);
            }
            eprintln!("Reload the lecture page to see the result once processing finishes.");
        }
        CommandResult::Configure(r) => {
            eprintln!("✓ {}", result.success_message());
            eprintln!("Server:   {}", r.server_url);
            if r.token_updated {
                eprintln!("CSRF token updated.");
            }
            if r.cookie_updated {
                eprintln!("Session cookie updated.");
            }
            eprintln!("Saved to {}", r.config_path);
        }
        CommandResult::Status(r) => {
            eprintln!();
            eprintln!("Server:          {}", r.server_url);
            match (&r.csrf_token, &r.token_source) {
                (Some(token), Some(source)) => {
                    eprintln!("CSRF token:      {} (from {})", token, source);
                }
                _ => {
                    eprintln!("CSRF token:      (not set)");
                    eprintln!();
                    eprintln!("Uploads will be rejected without a token.");
                    eprintln!("Run 'lecture-uploader configure --token <csrf>' to set one.");
                }
            }
            eprintln!(
                "Session cookie:  {}",
                if r.has_session_cookie { "set" } else { "(not set)" }
            );
            match r.request_timeout_seconds {
                Some(seconds) => eprintln!("Timeout:         {}s", seconds),
                None => eprintln!("Timeout:         none"),
            }
            eprintln!("Config file:     {}", r.config_path);
        }
        CommandResult::Help => {
            eprintln!("{}", HELP_TEXT);
        }
    }
}

/// 機械可読JSONを組み立てる
///
/// `CommandResult` のシリアライズ結果（`command` タグ付き）に `success: true` を加える。
fn machine_readable(result: &CommandResult) -> Result<String> {
    let mut json = serde_json::to_value(result)?;
    if let Some(object) = json.as_object_mut() {
        object.insert("success".to_string(), serde_json::Value::Bool(true));
    }
    Ok(serde_json::to_string(&json)?)
}

/// `--machine` 時のエラー出力
#[derive(Debug, Serialize)]
pub struct MachineError<'a> {
    pub success: bool,
    pub error: &'a str,
    pub causes: Vec<String>,
    pub exit_code: i32,
    pub severity: Option<ErrorSeverity>,
    pub hint: Option<&'a str>,
}

/// エラーをJSONでstdoutに出力する
pub fn output_machine_error(error: &MachineError<'_>) {
    match serde_json::to_string(error) {
        Ok(json) => println!("{}", json),
        // シリアライズに失敗した場合でも最低限の情報は出す
        Err(_) => println!(
            "{{\"success\":false,\"exit_code\":{}}}",
            error.exit_code
        ),
    }
}

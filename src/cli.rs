use crate::commands::{self, CommandResult};
use crate::commands::configure::ConfigureOptions;
use crate::commands::share::ShareOptions;
use crate::commands::upload::UploadOptions;
use crate::domain::share::SharePlatform;
use anyhow::{Context, Result, bail};
use std::collections::{HashMap, HashSet};

/// グローバルフラグ（コマンドの前後どちらに置いてもよい）
pub const MACHINE_FLAG: &str = "--machine";

/// `--machine` が指定されているか
pub fn is_machine_output(args: &[String]) -> bool {
    args.iter().skip(1).any(|a| a == MACHINE_FLAG)
}

/// CLI引数を解析し、適切なコマンドにディスパッチする
pub async fn parse_args(args: &[String]) -> Result<CommandResult> {
    let machine_output = is_machine_output(args);
    let args: Vec<&str> = args
        .iter()
        .skip(1)
        .map(String::as_str)
        .filter(|a| *a != MACHINE_FLAG)
        .collect();

    // 引数なしはヘルプと同じ扱い
    let Some((command, rest)) = args.split_first() else {
        return Ok(commands::help::execute());
    };

    match *command {
        "upload" => {
            let options = parse_upload(rest)?;
            commands::upload::execute(options, machine_output)
                .await
                .context("Upload command failed")
        }
        "like" => {
            let parsed = ParsedArgs::parse(rest, &[], &[], 1)?;
            let lecture_id = parsed.lecture_id()?;
            commands::like::execute(lecture_id)
                .await
                .context("Like command failed")
        }
        "share" => {
            let options = parse_share(rest)?;
            commands::share::execute(options)
                .await
                .context("Share command failed")
        }
        "subtitles" => {
            let parsed = ParsedArgs::parse(rest, &[], &[], 1)?;
            commands::subtitles::execute(parsed.lecture_id()?)
                .await
                .context("Subtitles command failed")
        }
        "dub" => {
            let mut parsed = ParsedArgs::parse(rest, &["--language"], &[], 1)?;
            let lecture_id = parsed.lecture_id()?;
            commands::dub::execute(lecture_id, parsed.take("--language"))
                .await
                .context("Dub command failed")
        }
        "configure" => {
            let options = parse_configure(rest)?;
            commands::configure::execute(options)
                .await
                .context("Configure command failed")
        }
        "status" => {
            ParsedArgs::parse(rest, &[], &[], 0)?;
            commands::status::execute()
                .await
                .context("Status command failed")
        }
        "help" | "--help" | "-h" => Ok(commands::help::execute()),
        _ => bail!(
            "Unknown command: '{}'. Use 'help' to see available commands.",
            command
        ),
    }
}

fn parse_upload(rest: &[&str]) -> Result<UploadOptions> {
    let mut parsed = ParsedArgs::parse(
        rest,
        &["--title", "--course-id", "--description", "--thumbnail", "--mime", "--name"],
        &["--publish", "--progress"],
        1,
    )?;

    let file_path = parsed
        .positional(0)
        .context("Please specify a file path for upload command")?;
    let title = parsed
        .take("--title")
        .filter(|t| !t.trim().is_empty())
        .context("Please specify a lecture title with --title")?;
    let course_id = parsed
        .take("--course-id")
        .context("Please specify the course with --course-id")?;
    let course_id = course_id
        .parse::<u64>()
        .with_context(|| format!("Course ID must be a positive integer, got '{}'", course_id))?;

    Ok(UploadOptions {
        file_path,
        title,
        course_id,
        description: parsed.take("--description").unwrap_or_default(),
        publish: parsed.flag("--publish"),
        thumbnail_path: parsed.take("--thumbnail"),
        mime_override: parsed.take("--mime"),
        stdin_name: parsed.take("--name"),
        show_progress: parsed.flag("--progress"),
    })
}

fn parse_share(rest: &[&str]) -> Result<ShareOptions> {
    let mut parsed = ParsedArgs::parse(rest, &["--url", "--title"], &[], 2)?;
    let lecture_id = parsed.lecture_id()?;
    let platform: SharePlatform = parsed
        .positional(1)
        .context("Please specify a platform: email, whatsapp, facebook or twitter")?
        .parse()?;
    let lecture_url = parsed
        .take("--url")
        .context("Please specify the lecture page URL with --url")?;

    Ok(ShareOptions {
        lecture_id,
        platform,
        lecture_url,
        title: parsed.take("--title"),
    })
}

fn parse_configure(rest: &[&str]) -> Result<ConfigureOptions> {
    let mut parsed = ParsedArgs::parse(
        rest,
        &["--server", "--token", "--cookie", "--timeout"],
        &["--token-stdin"],
        0,
    )?;

    let token_from_stdin = parsed.flag("--token-stdin");
    let csrf_token = parsed.take("--token");
    if token_from_stdin && csrf_token.is_some() {
        bail!("Use either --token or --token-stdin, not both.");
    }

    let request_timeout_seconds = parsed
        .take("--timeout")
        .map(|secs| {
            secs.parse::<u64>()
                .with_context(|| format!("Timeout must be a number of seconds, got '{}'", secs))
        })
        .transpose()?;

    Ok(ConfigureOptions {
        server_url: parsed.take("--server"),
        csrf_token,
        session_cookie: parsed.take("--cookie"),
        request_timeout_seconds,
        token_from_stdin,
    })
}

/// コマンド以降の引数（位置引数、値付きオプション、フラグ）
#[derive(Debug, Default)]
struct ParsedArgs {
    positionals: Vec<String>,
    values: HashMap<String, String>,
    flags: HashSet<String>,
}

impl ParsedArgs {
    /// `value_options` は次の引数を値として取るオプション、`flag_options` は値なし。
    /// 位置引数が `max_positionals` 個を超えるとエラー
    fn parse(
        rest: &[&str],
        value_options: &[&str],
        flag_options: &[&str],
        max_positionals: usize,
    ) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = rest.iter();

        while let Some(arg) = iter.next() {
            if value_options.contains(arg) {
                let value = iter
                    .next()
                    .with_context(|| format!("Option {} requires a value", arg))?;
                parsed.values.insert(arg.to_string(), value.to_string());
            } else if flag_options.contains(arg) {
                parsed.flags.insert(arg.to_string());
            } else if arg.starts_with("--") {
                bail!("Unknown option: '{}'. Use 'help' to see available options.", arg);
            } else if parsed.positionals.len() < max_positionals {
                parsed.positionals.push(arg.to_string());
            } else {
                bail!("Unexpected argument: '{}'. Use 'help' to see usage.", arg);
            }
        }

        Ok(parsed)
    }

    fn positional(&self, index: usize) -> Option<String> {
        self.positionals.get(index).cloned()
    }

    fn take(&mut self, option: &str) -> Option<String> {
        self.values.remove(option)
    }

    fn flag(&self, option: &str) -> bool {
        self.flags.contains(option)
    }

    /// 1番目の位置引数を講義IDとして読む
    fn lecture_id(&self) -> Result<u64> {
        let raw = self
            .positional(0)
            .context("Please specify a lecture ID")?;
        raw.parse::<u64>()
            .with_context(|| format!("Lecture ID must be a positive integer, got '{}'", raw))
    }
}

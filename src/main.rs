mod api;
mod cli;
mod commands;
mod config;
mod domain;
mod error_severity;
mod presentation;

use anyhow::Result;
use api::error::InfraError;
use config::error::ConfigError;
use domain::error::{DomainError, UploadError};
use error_severity::ErrorSeverity;
use presentation::output::{self, MachineError};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let machine_output = cli::is_machine_output(&args);

    if let Err(e) = run(&args, machine_output).await {
        handle_error(e, machine_output);
    }
}

/// ログ出力の初期化
///
/// stdout は `--machine` の出力用に空けておき、ログは stderr に出す。
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// アプリケーションのメイン処理
async fn run(args: &[String], machine_output: bool) -> Result<()> {
    let result = cli::parse_args(args).await?;
    output::output_result(&result, machine_output)
}

/// エラーハンドリングとユーザーへの表示
///
/// anyhow::Error から元のエラー型を downcast して、
/// エラーの種類に応じた exit code とメッセージを決定する。
fn handle_error(error: anyhow::Error, machine_output: bool) {
    let severity = determine_severity(&error);
    let exit_code = severity.map(ErrorSeverity::exit_code).unwrap_or(1);
    let hint = get_error_hint(&error);

    if machine_output {
        let message = error.to_string();
        output::output_machine_error(&MachineError {
            success: false,
            error: &message,
            causes: error.chain().skip(1).map(|c| c.to_string()).collect(),
            exit_code,
            severity,
            hint,
        });
    } else {
        // エラーメッセージのヘッダー
        eprintln!("Error: {}", error);

        // エラーチェーンを辿って詳細を表示
        let chain: Vec<_> = error.chain().skip(1).collect();
        if !chain.is_empty() {
            eprintln!("\nCaused by:");
            for (i, cause) in chain.iter().enumerate() {
                eprintln!("  {}: {}", i + 1, cause);
            }
        }

        // アップロード失敗は画面と同じ文言も出す
        if let Some(upload_err) = error.downcast_ref::<UploadError>() {
            eprintln!("\n{}", upload_err.user_message());
        } else if let Some(domain_err) = error.downcast_ref::<DomainError>() {
            eprintln!("\n{}", domain_err.user_message());
        }

        if let Some(hint) = hint {
            eprintln!("\nHint: {}", hint);
        }
    }

    std::process::exit(exit_code);
}

/// エラーチェーンから深刻度を決定
///
/// 既知のエラー型が見つからなければ None（終了コード 1）。
fn determine_severity(error: &anyhow::Error) -> Option<ErrorSeverity> {
    error.chain().find_map(|cause| {
        if let Some(domain_err) = cause.downcast_ref::<DomainError>() {
            return Some(domain_err.severity());
        }
        if let Some(upload_err) = cause.downcast_ref::<UploadError>() {
            return Some(upload_err.severity());
        }
        if let Some(infra_err) = cause.downcast_ref::<InfraError>() {
            return Some(infra_err.severity());
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return Some(config_err.severity());
        }
        None
    })
}

/// エラーに対するユーザー向けヒントを取得
fn get_error_hint(error: &anyhow::Error) -> Option<&str> {
    error.chain().find_map(|cause| {
        if let Some(domain_err) = cause.downcast_ref::<DomainError>() {
            return domain_err.hint();
        }
        if let Some(upload_err) = cause.downcast_ref::<UploadError>() {
            return upload_err.hint();
        }
        if let Some(infra_err) = cause.downcast_ref::<InfraError>() {
            return infra_err.hint();
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_err.hint();
        }
        None
    })
}

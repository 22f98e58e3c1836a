/// プレゼンテーション層: ユーザー入力処理
///
/// stdinからの秘密情報（CSRFトークン）や動画データの入力を取得し、
/// アプリケーション層で使用可能な形式に変換します。
use crate::domain::error::DomainError;
use anyhow::{Context, Result, bail};
use std::io::{self, BufRead};
use tokio::io::{AsyncRead, AsyncReadExt};

/// stdin からパイプでCSRFトークンを取得（1行目のみ使用）
///
/// シェル履歴にトークンを残さないための入力経路。
pub fn read_token_from_stdin() -> Result<String> {
    read_token(io::stdin().lock())
}

fn read_token<R: BufRead>(mut reader: R) -> Result<String> {
    let mut token = String::new();
    reader
        .read_line(&mut token)
        .context("Failed to read CSRF token from stdin")?;
    let token = token.trim().to_string();

    if token.is_empty() {
        bail!("CSRF token cannot be empty. Please ensure the first line of stdin contains the token.");
    }

    Ok(token)
}

/// stdin から動画のバイト列を読み込む（`upload -`）
///
/// `max_size` を超えた時点で読み込みをやめ、`DomainError::TooLarge` を返す。
pub async fn read_video_from_stdin(max_size: u64) -> Result<Vec<u8>> {
    read_video(tokio::io::stdin(), max_size).await
}

async fn read_video<R: AsyncRead + Unpin>(reader: R, max_size: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .context("Failed to read video from stdin")?;

    let size = bytes.len() as u64;
    if size > max_size {
        tracing::info!(read = size, max = max_size, "stdin video exceeds the size limit");
        return Err(DomainError::TooLarge {
            size,
            max: max_size,
        }
        .into());
    }

    tracing::debug!(bytes = size, "read video from stdin");
    Ok(bytes)
}

//! エラー深刻度と終了コード
//!
//! 各層（domain, api, config）のエラーは最終的にこの分類へ写像され、
//! main.rs がプロセスの終了コードと `--machine` 出力の `severity` を決める。
//! このモジュール自体は他のモジュールに依存しない。

use serde::Serialize;
use std::fmt;

/// エラーの深刻度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// 入力ミス（動画以外のファイル、サイズ超過、引数不足など）
    ///
    /// **Exit Code: 1**
    UserError,

    /// 設定の問題（サーバーURL未設定、config.toml の破損など）
    ///
    /// **Exit Code: 2**
    ConfigError,

    /// サーバー側・ネットワーク側の失敗（チャンク送信失敗、講義作成失敗など）
    ///
    /// **Exit Code: 3**
    SystemError,
}

impl ErrorSeverity {
    /// 対応する終了コード
    pub fn exit_code(self) -> i32 {
        match self {
            Self::UserError => 1,
            Self::ConfigError => 2,
            Self::SystemError => 3,
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UserError => "user error",
            Self::ConfigError => "configuration error",
            Self::SystemError => "system error",
        };
        f.write_str(label)
    }
}

/// ドメイン層
///
/// アップロードセッションの状態遷移、チャンク分割、検証、表示用フォーマット、
/// 共有リンク生成など、外部I/Oから独立したビジネスロジック。
/// ネットワークと画面は `ports` のトレイト越しにのみ扱う。
pub mod controller;
pub mod error;
pub mod formatter;
pub mod ports;
pub mod progress;
pub mod session;
pub mod share;
pub mod source;
pub mod validator;

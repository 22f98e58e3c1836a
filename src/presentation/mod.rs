/// プレゼンテーション層
///
/// 端末とのやり取りを担当する。ドメイン層の `UploadView` を実装し、
/// コマンド結果を stderr（人間向け）か stdout（`--machine` のJSON）に書き出す。
///
/// # モジュール
/// - `input`: stdin からのCSRFトークン・動画データ読み込み
/// - `output`: コマンド結果とエラーの出力
/// - `progress`: 進捗イベントを表示用の行と進捗バーに変換
/// - `view`: アップロード画面（入力の有効/無効、リダイレクト先の保持）

pub mod input;
pub mod output;
pub mod progress;
pub mod view;

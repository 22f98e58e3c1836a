// 講義サーバーAPIクライアントモジュール
//
// 講義サーバーとのHTTP通信をすべて担当する。
// - client:  reqwest のラッパー（CSRFヘッダー、Cookie、エラー変換）
// - lecture: チャンク受付と講義作成（ドメイン層の LectureBackend 実装）
// - actions: いいね・共有・字幕生成・吹き替え生成
// - types:   JSON応答の型

pub mod actions;
pub mod client;
pub mod error;
pub mod lecture;
pub mod types;

/// httpmock のサーバーを起動できる環境か（サンドボックスではlocalhostへのbindが禁止される場合がある）
#[cfg(test)]
pub(crate) fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

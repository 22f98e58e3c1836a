/// アプリケーション設定モジュール
///
/// コンパイル時定数として埋め込まれる静的設定。
/// サーバーとの契約（エンドポイント、チャンクサイズ、許可MIMEタイプ）を表すため、
/// 実行時には変更できない。

/// 1 MiB
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// アプリケーション全体の設定
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upload: UploadConfig,
}

/// API関連の設定
#[derive(Debug, Clone, Copy)]
pub struct ApiConfig {
    /// UserConfig に server_url が無い場合の接続先
    pub default_server_url: &'static str,

    /// CSRFトークンを載せるリクエストヘッダー名
    pub csrf_header: &'static str,

    /// チャンク受付エンドポイント
    pub chunk_endpoint: &'static str,

    /// 講義作成（finalize）エンドポイント
    pub finalize_endpoint: &'static str,

    /// 講義単位のエンドポイントの接頭辞（`{prefix}/{id}/like` など）
    pub lecture_prefix: &'static str,
}

/// アップロード関連の設定
#[derive(Debug, Clone, Copy)]
pub struct UploadConfig {
    /// チャンクサイズ (バイト)
    pub chunk_size: u64,

    /// アップロード可能な最大ファイルサイズ (バイト)
    pub max_file_size: u64,

    /// 受け付ける動画のMIMEタイプ
    pub allowed_types: &'static [&'static str],

    /// 成功メッセージ表示からリダイレクトまでの待ち時間 (ミリ秒)
    pub redirect_delay_ms: u64,
}

/// グローバル設定
pub const APP_CONFIG: AppConfig = AppConfig {
    api: ApiConfig {
        default_server_url: "http://localhost:5000",
        csrf_header: "X-CSRFToken",
        chunk_endpoint: "/instructor/lectures/upload_progress",
        finalize_endpoint: "/instructor/lectures/create_with_upload",
        lecture_prefix: "/instructor/lectures",
    },
    upload: UploadConfig {
        chunk_size: BYTES_PER_MB,
        max_file_size: 500 * BYTES_PER_MB,
        allowed_types: &[
            "video/mp4",
            "video/webm",
            "video/ogg",
            "video/quicktime",
            "video/x-msvideo",
            "video/x-matroska",
        ],
        redirect_delay_ms: 2000,
    },
};

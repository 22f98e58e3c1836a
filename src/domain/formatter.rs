/// ドメインサービス: 表示用フォーマット
///
/// ファイルサイズと進捗テキストを人間向けの文字列に変換する。

/// サイズの単位（1024倍ごと）
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// バイト数を 1024 進の単位付き文字列にする
///
/// 小数点以下は最大2桁で、末尾の0は落とす。
/// - `0` → `"0 Bytes"`
/// - `1536` → `"1.5 KB"`
/// - `524288000` → `"500 MB"`
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// 進捗表示のテキスト
///
/// サーバーのメッセージがあればそれを、無ければ `"<四捨五入した%>% uploaded"`。
pub fn progress_text(percentage: f64, message: Option<&str>) -> String {
    match message {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!("{}% uploaded", percentage.round()),
    }
}

/// ドメインサービス: 共有リンクの生成
///
/// 共有先プラットフォームごとに、講義タイトルとURLを埋め込んだ外部URLを作る。
use crate::domain::error::DomainError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Email,
    Whatsapp,
    Facebook,
    Twitter,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 4] = [
        SharePlatform::Email,
        SharePlatform::Whatsapp,
        SharePlatform::Facebook,
        SharePlatform::Twitter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharePlatform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| DomainError::UnknownPlatform {
                platform: s.to_string(),
            })
    }
}

/// URLのクエリ値として安全な形にエンコードする（空白は %20）
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// 共有先の外部URLを作る
pub fn share_link(platform: SharePlatform, lecture_title: &str, lecture_url: &str) -> String {
    match platform {
        SharePlatform::Email => format!(
            "mailto:?subject={}&body={}",
            encode_component(&format!("Check out this lecture: {}", lecture_title)),
            encode_component(&format!(
                "I thought you might be interested in this lecture: {}",
                lecture_url
            )),
        ),
        SharePlatform::Whatsapp => format!(
            "https://wa.me/?text={}",
            encode_component(&format!("{} {}", lecture_title, lecture_url))
        ),
        SharePlatform::Facebook => format!(
            "https://www.facebook.com/sharer/sharer.php?u={}",
            encode_component(lecture_url)
        ),
        SharePlatform::Twitter => format!(
            "https://twitter.com/intent/tweet?text={}&url={}",
            encode_component(lecture_title),
            encode_component(lecture_url)
        ),
    }
}

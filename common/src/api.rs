//! REST APIのパス組み立て

/// 画像のサイズ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    Thumbnail,
    Full,
}

impl ImageVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageVariant::Thumbnail => "thumbnail",
            ImageVariant::Full => "full",
        }
    }
}

/// APIのエンドポイント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// `base` は空（同一オリジン）か `https://host` 形式
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `cache_buster` はキャッシュ回避用のミリ秒タイムスタンプ
    pub fn layer_config(&self, cache_buster: u64) -> String {
        self.url(&format!("/api/layer_config?_t={}", cache_buster))
    }

    pub fn issues(&self, limit: usize, cache_buster: u64) -> String {
        self.url(&format!(
            "/api/issues?within_city_limits_flag=1&limit={}&_t={}",
            limit, cache_buster
        ))
    }

    pub fn issue(&self, id: &str) -> String {
        self.url(&format!("/api/issues/{}", encode_segment(id)))
    }

    pub fn comments(&self, id: &str) -> String {
        self.url(&format!("/api/issues/{}/comments", encode_segment(id)))
    }

    pub fn boundary(&self, filename: &str) -> String {
        self.url(&format!("/api/boundaries/{}", encode_segment(filename)))
    }

    pub fn image(&self, id: &str, variant: Option<ImageVariant>) -> String {
        let path = format!("/api/image/{}", encode_segment(id));
        match variant {
            Some(v) => self.url(&format!("{}?variant={}", path, v.as_str())),
            None => self.url(&path),
        }
    }

    pub fn images_batch(&self) -> String {
        self.url("/api/images/batch")
    }

    pub fn last_sync(&self) -> String {
        self.url("/api/last-sync")
    }

    pub fn stats(&self) -> String {
        self.url("/api/issues/stats")
    }

    pub fn community_top_issues(&self) -> String {
        self.url("/api/stats/community-top-issues")
    }

    pub fn top_issue_per_community(&self) -> String {
        self.url("/api/stats/top-issue-per-community")
    }
}

/// パス1区間分のパーセントエンコード
fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

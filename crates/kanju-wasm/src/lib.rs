use kanju_parse::link;
use kanju_parse::PlatformDatabase;
use wasm_bindgen::prelude::*;

/// `{"title": ..., "episode": ...}` for a video page URL.
#[wasm_bindgen]
pub fn extract_video_info(url: &str) -> String {
    let meta = kanju_parse::extract(url);
    serde_json::to_string(&meta).unwrap_or_else(|_| "{}".to_string())
}

#[wasm_bindgen]
pub fn is_valid_video_url(url: &str) -> bool {
    link::is_valid_video_url(url)
}

#[wasm_bindgen]
pub fn player_url(template: &str, video_url: &str) -> String {
    link::player_url(template, video_url)
}

/// Name of the known platform serving `url`, if any.
#[wasm_bindgen]
pub fn supported_platform(url: &str) -> Option<String> {
    PlatformDatabase::embedded().match_url(url).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_info_json() {
        let json: serde_json::Value =
            serde_json::from_str(&extract_video_info("https://x.com/watch?ep=5")).unwrap();
        assert_eq!(json["title"], "watch");
        assert_eq!(json["episode"], "第5集");
    }

    #[test]
    fn test_supported_platform() {
        assert_eq!(
            supported_platform("https://www.mgtv.com/b/1/2.html").as_deref(),
            Some("Mango TV")
        );
        assert!(supported_platform("https://example.com/").is_none());
    }
}

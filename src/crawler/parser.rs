use super::patterns::PATTERNS;

/// Extract candidate image URLs from a search result page
///
/// Scripts are scanned in document order and the URLs of the first script
/// that mentions any image are returned.
pub fn extract_image_urls(html: &str) -> Vec<String> {
    for script in PATTERNS.script.captures_iter(html) {
        let body = &script[1];

        let urls: Vec<String> = PATTERNS
            .image_url
            .find_iter(body)
            .map(|m| decode_unicode_escapes(m.as_str()))
            .collect();

        if !urls.is_empty() {
            return urls;
        }
    }

    Vec::new()
}

/// Replace `\uXXXX` escapes with the characters they encode
fn decode_unicode_escapes(s: &str) -> String {
    PATTERNS
        .unicode_escape
        .replace_all(s, |caps: &regex::Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

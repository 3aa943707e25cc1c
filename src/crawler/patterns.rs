use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex patterns for result-page parsing
pub struct Patterns {
    /// Inline `<script>` bodies
    pub script: Regex,
    /// Absolute image URLs embedded in script text
    pub image_url: Regex,
    /// JavaScript `\uXXXX` escapes
    pub unicode_escape: Regex,
}

impl Patterns {
    pub fn new() -> Self {
        Self {
            script: Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("Invalid script regex"),
            image_url: Regex::new(r"http[^\[]*?\.(?:jpg|png|bmp)")
                .expect("Invalid image_url regex"),
            unicode_escape: Regex::new(r"\\u([0-9a-fA-F]{4})")
                .expect("Invalid unicode_escape regex"),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global singleton for patterns
pub static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);

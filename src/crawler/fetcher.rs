use crate::crawler::{HttpClient, Result};
use image::ImageReader;
use std::io::Cursor;
use tracing::debug;

/// A downloaded image that passed the size filter
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// File extension without the dot
    pub extension: String,
}

/// Download one candidate URL
///
/// Returns `Ok(None)` when the body is not a decodable image or is smaller
/// than `min_size`.
pub async fn fetch(
    client: &HttpClient,
    url: &str,
    min_size: Option<(u32, u32)>,
) -> Result<Option<FetchedImage>> {
    let bytes = client.get_bytes(url).await?;

    let Some(extension) = inspect(&bytes, min_size) else {
        debug!("Rejected image from {}", url);
        return Ok(None);
    };

    Ok(Some(FetchedImage { bytes, extension }))
}

/// Extension for an image body, or `None` if it cannot be decoded or is too small
fn inspect(bytes: &[u8], min_size: Option<(u32, u32)>) -> Option<String> {
    let format = image::guess_format(bytes).ok()?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .ok()?;

    if let Some((min_width, min_height)) = min_size
        && (width < min_width || height < min_height)
    {
        debug!(
            "Image {}x{} below minimum {}x{}",
            width, height, min_width, min_height
        );
        return None;
    }

    format.extensions_str().first().map(|e| (*e).to_string())
}

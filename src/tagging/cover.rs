use crate::api::Thumbnail;

/// Pick the cover to embed: the first thumbnail at least `min_width` wide,
/// otherwise the last (largest) one
pub fn pick_cover(thumbnails: &[Thumbnail], min_width: u32) -> Option<&Thumbnail> {
    thumbnails
        .iter()
        .find(|t| t.width.is_some_and(|w| w >= min_width))
        .or_else(|| thumbnails.last())
}

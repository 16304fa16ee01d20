use std::collections::HashMap;

use compact_str::CompactString;

/// Identifier for a photo. The layout engine never inspects anything else
/// about a photo; geometry is keyed by id so results stay cheap to clone.
pub type PhotoId = u64;

/// Caller-supplied mapping from photo id to width/height ratio.
/// May be partially populated (photos mid-resolution) and may contain
/// NaN/zero/negative junk; every consumer sanitises on read.
pub type RatioMap = HashMap<PhotoId, f64>;

/// A photo as the gallery views see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: PhotoId,
    /// Source path or URL of the image file
    pub src: CompactString,
    /// Alt text for rendering (photo name, series title, or a synthetic label)
    pub alt: CompactString,
}

impl Photo {
    pub fn new(id: PhotoId, src: &str, alt: &str) -> Self {
        Self {
            id,
            src: CompactString::new(src),
            alt: CompactString::new(alt),
        }
    }
}

/// One photo attached to a series listing, before hero-pool collection.
#[derive(Debug, Clone)]
pub struct PreviewPhoto {
    /// Photo id; 0 when the backend did not assign one
    pub id: PhotoId,
    /// Public URL of the preview rendition (may be empty)
    pub public_url: CompactString,
    /// Original upload file name (may be empty)
    pub original_name: CompactString,
}

/// A series entry as returned by the listing endpoint, reduced to the
/// fields the hero pool cares about.
#[derive(Debug, Clone)]
pub struct SeriesPreview {
    pub id: u64,
    pub title: CompactString,
    pub preview_photos: Vec<PreviewPhoto>,
}

use serde::Serialize;

/// Per-item media info from the batch info endpoint.
///
/// The `takes_up_space` and `is_original_quality` flags are tri-state: the
/// trailing storage element may omit them entirely (`None`), otherwise they
/// are computed from sentinel values (`1` and `2` respectively).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaInfo {
    pub product_id: Option<String>,
    pub description_full: Option<String>,
    pub file_name: Option<String>,
    pub timestamp: Option<i64>,
    pub creation_timestamp: Option<i64>,
    pub size: Option<u64>,
    pub takes_up_space: Option<bool>,
    pub space_taken: Option<u64>,
    pub is_original_quality: Option<bool>,
}

/// Extended info for a single item.
///
/// This is the only endpoint that distinguishes a truly empty description
/// from one shadowed by the camera "other" field; the batch info endpoint
/// reports the shadowing value as `description_full`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemInfoExt {
    pub product_id: Option<String>,
    pub description_full: Option<String>,
    pub file_name: Option<String>,
    /// The shadowing "other" text, when present.
    pub other: Option<String>,
}

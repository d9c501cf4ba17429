use serde::Serialize;

/// An album as it appears in the albums listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Album {
    pub product_id: Option<String>,
    pub album_id: Option<String>,
    pub name: Option<String>,
    pub item_count: Option<u64>,
    /// Defaults to `false` when the metadata tag omits the flag.
    pub is_shared: bool,
}

impl Album {
    /// Identifier used when adding items to this album.
    pub fn media_key(&self) -> Option<&str> {
        self.product_id.as_deref()
    }
}

/// A shared link as it appears in the shared-links listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SharedLink {
    pub product_id: Option<String>,
    pub link_id: Option<String>,
    pub item_count: Option<u64>,
}

use serde::Serialize;

/// Request-key derivation shared by every media-shaped entity.
///
/// Different endpoint families address the same item through different
/// identifiers: mutation endpoints (trash, archive, favorite, locked folder)
/// take the *dedup key*, album and info endpoints take the *media key*.
/// Either may be absent on a defensively-decoded item; callers skip such
/// items rather than fail.
pub trait MediaRef {
    /// Identifier used by mutation endpoint families.
    fn dedup_key(&self) -> Option<&str>;
    /// Identifier used by album-membership and info endpoint families.
    fn media_key(&self) -> Option<&str>;
}

/// A library item as it appears in timeline, search and favorites pages.
///
/// Every field is a read-only snapshot; a fresh decode replaces prior state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaItem {
    pub product_id: Option<String>,
    pub media_id: Option<String>,
    pub timestamp: Option<i64>,
    pub creation_timestamp: Option<i64>,
    pub thumb: Option<String>,
    pub res_width: Option<u64>,
    pub res_height: Option<u64>,
    pub is_archived: Option<bool>,
    pub is_favorite: Option<bool>,
    pub duration: Option<u64>,
    pub description_short: Option<String>,
    /// Presence of the live-photo extension tag.
    pub is_live_photo: bool,
    pub live_photo_duration: Option<u64>,
    /// `true` only when the ownership marker sequence is present and clean;
    /// a missing marker means not owned, matching the source grammar.
    pub is_owned: bool,
}

/// Narrow projection of the library grammar used by the locked folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LockedFolderItem {
    pub product_id: Option<String>,
    pub media_id: Option<String>,
    pub timestamp: Option<i64>,
    pub creation_timestamp: Option<i64>,
    pub duration: Option<u64>,
}

/// An item as it appears inside an album or shared link.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlbumItem {
    pub product_id: Option<String>,
    pub media_id: Option<String>,
    pub thumb: Option<String>,
    pub res_width: Option<u64>,
    pub res_height: Option<u64>,
    pub timestamp: Option<i64>,
    pub creation_timestamp: Option<i64>,
    pub duration: Option<u64>,
    pub is_live_photo: bool,
    pub live_photo_duration: Option<u64>,
}

/// An item as it appears in the trash listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrashItem {
    pub product_id: Option<String>,
    pub media_id: Option<String>,
    pub thumb: Option<String>,
    pub res_width: Option<u64>,
    pub res_height: Option<u64>,
    pub timestamp: Option<i64>,
    pub creation_timestamp: Option<i64>,
    pub duration: Option<u64>,
}

macro_rules! media_ref {
    ($($entity:ty),+ $(,)?) => {
        $(impl MediaRef for $entity {
            fn dedup_key(&self) -> Option<&str> {
                self.media_id.as_deref()
            }
            fn media_key(&self) -> Option<&str> {
                self.product_id.as_deref()
            }
        })+
    };
}
media_ref!(MediaItem, LockedFolderItem, AlbumItem, TrashItem);

impl<T: MediaRef + ?Sized> MediaRef for &T {
    fn dedup_key(&self) -> Option<&str> {
        (**self).dedup_key()
    }
    fn media_key(&self) -> Option<&str> {
        (**self).media_key()
    }
}

//! Item and page grammars, one function per reverse-engineered shape.
//!
//! Field offsets are fixed per opcode and a raw array is never reinterpreted
//! under a different opcode. All functions are total over arbitrary input;
//! see [`Raw`] for the no-throw traversal contract.

use crate::models::{Album, AlbumItem, ItemInfoExt, LockedFolderItem, MediaInfo, MediaItem, Page, SharedLink,
                    TimelinePage, TrashItem};
use crate::raw::Raw;
use crate::tags::{NOT_OWNED_SENTINEL, TAG_ALBUM_META, TAG_DESCRIPTION_SHORT, TAG_DURATION, TAG_FAVORITE,
                  TAG_LIVE_PHOTO};
use serde_json::Value;

/// Ownership is "owned" iff the marker sequence at `[7]` is present and none
/// of its sub-entries contains the sentinel. A missing marker is not owned.
fn is_owned(item: Raw<'_>) -> bool {
    item.get(7)
        .as_array()
        .map(|subs| {
            !subs
                .iter()
                .any(|sub| sub.as_array().is_some_and(|s| s.iter().any(|v| v.as_i64() == Some(NOT_OWNED_SENTINEL))))
        })
        .unwrap_or(false)
}

pub fn media_item(item: Raw<'_>) -> MediaItem {
    let ext = item.last();
    MediaItem {
        product_id: item.get(0).as_id(),
        media_id: item.get(3).as_id(),
        timestamp: item.get(2).as_i64(),
        creation_timestamp: item.get(5).as_i64(),
        thumb: item.get(1).get(0).as_id(),
        res_width: item.get(1).get(1).as_u64(),
        res_height: item.get(1).get(2).as_u64(),
        is_archived: item.get(13).as_flag(),
        is_favorite: ext.ext(TAG_FAVORITE).get(0).as_flag(),
        duration: ext.ext(TAG_DURATION).get(0).as_u64(),
        description_short: ext.ext(TAG_DESCRIPTION_SHORT).get(0).as_id(),
        is_live_photo: ext.ext(TAG_LIVE_PHOTO).is_present(),
        live_photo_duration: ext.ext(TAG_LIVE_PHOTO).get(1).as_u64(),
        is_owned: is_owned(item),
    }
}

pub fn locked_folder_item(item: Raw<'_>) -> LockedFolderItem {
    LockedFolderItem {
        product_id: item.get(0).as_id(),
        media_id: item.get(3).as_id(),
        timestamp: item.get(2).as_i64(),
        creation_timestamp: item.get(5).as_i64(),
        duration: item.last().ext(TAG_DURATION).get(0).as_u64(),
    }
}

pub fn album_item(item: Raw<'_>) -> AlbumItem {
    let ext = item.last();
    AlbumItem {
        product_id: item.get(0).as_id(),
        media_id: item.get(3).as_id(),
        thumb: item.get(1).get(0).as_id(),
        res_width: item.get(1).get(1).as_u64(),
        res_height: item.get(1).get(2).as_u64(),
        timestamp: item.get(2).as_i64(),
        creation_timestamp: item.get(5).as_i64(),
        duration: ext.ext(TAG_DURATION).get(0).as_u64(),
        is_live_photo: ext.ext(TAG_LIVE_PHOTO).is_present(),
        live_photo_duration: ext.ext(TAG_LIVE_PHOTO).get(1).as_u64(),
    }
}

pub fn trash_item(item: Raw<'_>) -> TrashItem {
    TrashItem {
        product_id: item.get(0).as_id(),
        media_id: item.get(3).as_id(),
        thumb: item.get(1).get(0).as_id(),
        res_width: item.get(1).get(1).as_u64(),
        res_height: item.get(1).get(2).as_u64(),
        timestamp: item.get(2).as_i64(),
        creation_timestamp: item.get(5).as_i64(),
        duration: item.last().ext(TAG_DURATION).get(0).as_u64(),
    }
}

pub fn album(raw: Raw<'_>) -> Album {
    let meta = raw.last().ext(TAG_ALBUM_META);
    Album {
        product_id: raw.get(0).as_id(),
        album_id: raw.get(6).get(0).as_id(),
        name: meta.get(1).as_id(),
        item_count: meta.get(3).as_u64(),
        is_shared: meta.get(4).as_flag().unwrap_or(false),
    }
}

pub fn shared_link(raw: Raw<'_>) -> SharedLink {
    SharedLink {
        product_id: raw.get(6).as_id(),
        link_id: raw.get(17).as_id(),
        item_count: raw.get(3).as_u64(),
    }
}

pub fn media_info(raw: Raw<'_>) -> MediaInfo {
    let info = raw.get(1);
    let storage = info.last();
    MediaInfo {
        product_id: raw.get(0).as_id(),
        description_full: info.get(2).as_id(),
        file_name: info.get(3).as_id(),
        timestamp: info.get(6).as_i64(),
        creation_timestamp: info.get(8).as_i64(),
        size: info.get(9).as_u64(),
        takes_up_space: storage.get(0).is_present().then(|| storage.get(0).as_i64() == Some(1)),
        space_taken: storage.get(1).as_u64(),
        is_original_quality: storage.get(2).is_present().then(|| storage.get(2).as_i64() == Some(2)),
    }
}

pub fn item_info_ext(data: &Value) -> ItemInfoExt {
    let item = Raw::new(data).get(0);
    ItemInfoExt {
        product_id: item.get(0).as_id(),
        description_full: item.get(1).as_id(),
        file_name: item.get(2).as_id(),
        other: item.last().ext(TAG_DESCRIPTION_SHORT).get(0).as_id(),
    }
}

/// Timeline pages carry items at `[0]`, cursor at `[1]` and the timestamp of
/// the last item at `[2]`.
pub fn timeline_page(data: &Value) -> TimelinePage {
    let raw = Raw::new(data);
    TimelinePage {
        page: Page { items: raw.get(0).map_items(media_item), next_page_id: raw.get(1).as_id() },
        last_item_timestamp: raw.get(2).as_i64(),
    }
}

/// Search and favorites pages share the timeline item grammar without the
/// trailing timestamp.
pub fn library_page(data: &Value) -> Page<MediaItem> {
    let raw = Raw::new(data);
    Page { items: raw.get(0).map_items(media_item), next_page_id: raw.get(1).as_id() }
}

/// The locked folder inverts the usual shape: cursor at `[0]`, items at `[1]`.
pub fn locked_folder_page(data: &Value) -> Page<LockedFolderItem> {
    let raw = Raw::new(data);
    Page { items: raw.get(1).map_items(locked_folder_item), next_page_id: raw.get(0).as_id() }
}

pub fn links_page(data: &Value) -> Page<SharedLink> {
    let raw = Raw::new(data);
    Page { items: raw.get(0).map_items(shared_link), next_page_id: raw.get(1).as_id() }
}

pub fn albums_page(data: &Value) -> Page<Album> {
    let raw = Raw::new(data);
    Page { items: raw.get(0).map_items(album), next_page_id: raw.get(1).as_id() }
}

/// Album item pages shift one offset right: items at `[1]`, cursor at `[2]`.
pub fn album_items_page(data: &Value) -> Page<AlbumItem> {
    let raw = Raw::new(data);
    Page { items: raw.get(1).map_items(album_item), next_page_id: raw.get(2).as_id() }
}

pub fn trash_page(data: &Value) -> Page<TrashItem> {
    let raw = Raw::new(data);
    Page { items: raw.get(0).map_items(trash_item), next_page_id: raw.get(1).as_id() }
}

/// The batch info payload is itself the item sequence; there is no cursor.
pub fn media_info_list(data: &Value) -> Vec<MediaInfo> {
    Raw::new(data).map_items(media_info)
}

//! Decoding of the service's opaque, order-dependent nested-array payloads
//! into stable, named entities.
//!
//! The wire format is an internal, positional-array RPC protocol intended
//! only for the service's own browser client: every response is an
//! arbitrarily deep heterogeneous array whose meaning depends entirely on
//! which opcode ([`RpcId`]) produced it. This crate extracts the known
//! offsets defensively and does nothing else — it neither validates nor
//! evolves the protocol.
//!
//! Two guarantees hold for every function here:
//!
//! - **No failures.** A malformed or truncated payload decodes into a
//!   partially-populated entity with absent fields, never an error. Bulk
//!   operations must degrade gracefully when the service reshuffles
//!   trailing fields between versions.
//! - **Fixed offsets.** Each opcode maps to exactly one grammar; the same
//!   raw shape is never reinterpreted under a different opcode.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use snapops_decode::{Decoded, RpcId, decode};
//!
//! let payload = json!([[["album-key", null, null, null, null, null, ["id-1"],
//!     {"72930366": [null, "Holiday", null, 42, true]}]], "cursor-2"]);
//! let Some(Decoded::Albums(page)) = decode(&payload, RpcId::Albums) else {
//!     panic!("non-empty payload always decodes");
//! };
//! assert_eq!(page.items[0].name.as_deref(), Some("Holiday"));
//! assert_eq!(page.next_page_id.as_deref(), Some("cursor-2"));
//! ```

pub mod grammar;
mod models;
pub mod raw;
mod tags;

pub use crate::models::{Album, AlbumItem, ItemInfoExt, LockedFolderItem, MediaInfo, MediaItem, MediaRef, Page,
                        SharedLink, TimelinePage, TrashItem};
pub use crate::tags::{NOT_OWNED_SENTINEL, RpcId, TAG_ALBUM_META, TAG_DESCRIPTION_SHORT, TAG_DURATION, TAG_FAVORITE,
                      TAG_LIVE_PHOTO};
use serde_json::Value;
use tracing::instrument;

/// A decoded payload, one variant per endpoint family.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Timeline(TimelinePage),
    LockedFolder(Page<LockedFolderItem>),
    Search(Page<MediaItem>),
    SharedLinks(Page<SharedLink>),
    Albums(Page<Album>),
    AlbumItems(Page<AlbumItem>),
    Trash(Page<TrashItem>),
    ItemInfo(ItemInfoExt),
    BatchMediaInfo(Vec<MediaInfo>),
}

/// Decode a raw payload under the grammar of the opcode that produced it.
///
/// Returns `None` when the payload is absent or empty — callers must treat
/// that as "no data", not as a failure. Dispatch is exhaustive over
/// [`RpcId`], so an unhandled opcode is a compile error rather than a silent
/// `None`.
#[instrument(skip(data))]
pub fn decode(data: &Value, rpc: RpcId) -> Option<Decoded> {
    if !data.as_array().is_some_and(|a| !a.is_empty()) {
        return None;
    }
    Some(match rpc {
        RpcId::Timeline => Decoded::Timeline(grammar::timeline_page(data)),
        RpcId::LockedFolder => Decoded::LockedFolder(grammar::locked_folder_page(data)),
        RpcId::Search => Decoded::Search(grammar::library_page(data)),
        RpcId::SharedLinks => Decoded::SharedLinks(grammar::links_page(data)),
        RpcId::Albums => Decoded::Albums(grammar::albums_page(data)),
        RpcId::AlbumItems => Decoded::AlbumItems(grammar::album_items_page(data)),
        RpcId::Trash => Decoded::Trash(grammar::trash_page(data)),
        RpcId::ItemInfo => Decoded::ItemInfo(grammar::item_info_ext(data)),
        RpcId::BatchMediaInfo => Decoded::BatchMediaInfo(grammar::media_info_list(data)),
    })
}

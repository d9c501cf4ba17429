//! Protocol constants reverse-engineered from the service's browser client.
//!
//! The opcode strings and extension-field tags below are part of the wire
//! contract: the service addresses optional attributes through large integer
//! keys inside a trailing "extension map" element, much like protobuf
//! extension numbers. They must be matched by exact integer equality and
//! never reinterpreted under a different opcode.

/// Favorite flag; value at `[0]`.
pub const TAG_FAVORITE: u64 = 163238866;
/// Playback duration in milliseconds; value at `[0]`.
pub const TAG_DURATION: u64 = 76647426;
/// Short description; value at `[0]`.
pub const TAG_DESCRIPTION_SHORT: u64 = 396644657;
/// Live-photo marker; presence is the flag, duration at `[1]`.
pub const TAG_LIVE_PHOTO: u64 = 146008172;
/// Album metadata; name at `[1]`, item count at `[3]`, shared flag at `[4]`.
pub const TAG_ALBUM_META: u64 = 72930366;

/// Ownership sentinel: an item is owned iff no entry of its ownership marker
/// sequence (offset `[7]`) contains this value.
pub const NOT_OWNED_SENTINEL: i64 = 27;

/// Closed set of RPC opcodes the decoder understands.
///
/// Each opcode corresponds to exactly one endpoint family and therefore to
/// exactly one payload grammar. Dispatch over this enum is exhaustive: an
/// opcode outside this set cannot be constructed, which closes the silent
/// `undefined` hole the browser client has for unrecognized opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcId {
    /// Main library timeline page (`lcxiM`).
    Timeline,
    /// Locked folder listing page (`nMFwOc`).
    LockedFolder,
    /// Search results page, also used for favorites (`EzkLib`).
    Search,
    /// Shared links listing page (`F2A0H`).
    SharedLinks,
    /// Albums listing page (`Z5xsfc`).
    Albums,
    /// Items of one album or shared link (`snAcKc`).
    AlbumItems,
    /// Trash listing page (`zy0IHe`).
    Trash,
    /// Extended info for a single item (`VrseUb`).
    ItemInfo,
    /// Media info for a batch of items (`EWgK9e`).
    BatchMediaInfo,
}

impl RpcId {
    /// The wire opcode string sent alongside the request.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeline => "lcxiM",
            Self::LockedFolder => "nMFwOc",
            Self::Search => "EzkLib",
            Self::SharedLinks => "F2A0H",
            Self::Albums => "Z5xsfc",
            Self::AlbumItems => "snAcKc",
            Self::Trash => "zy0IHe",
            Self::ItemInfo => "VrseUb",
            Self::BatchMediaInfo => "EWgK9e",
        }
    }
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

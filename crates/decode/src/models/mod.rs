mod album;
mod info;
mod media;
mod page;

pub use self::album::{Album, SharedLink};
pub use self::info::{ItemInfoExt, MediaInfo};
pub use self::media::{AlbumItem, LockedFolderItem, MediaItem, MediaRef, TrashItem};
pub use self::page::{Page, TimelinePage};

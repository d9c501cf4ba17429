//! Transport capability for the photo service's internal RPC endpoints.
//!
//! The service exposes an undocumented, positional-array RPC protocol meant
//! only for its own browser client. This crate defines that surface as the
//! [`PhotosApi`] trait — one async operation per endpoint family — without
//! implementing the HTTP exchange itself; the network client is an external
//! collaborator that carries no design weight here.
//!
//! Paging operations return the raw [`Value`] payload; callers pair each
//! with the matching page decode. Action operations return the raw action
//! result, which on success is an ordered sequence.

pub mod error;
#[cfg(feature = "mock")]
mod mock;

pub use crate::error::{Error, ErrorKind, Result};
#[cfg(feature = "mock")]
pub use crate::mock::{Call, MockApi};
use async_trait::async_trait;
use serde_json::Value;

/// One async operation per reverse-engineered endpoint family.
///
/// # Examples
///
/// ```
/// use snapops_api::{PhotosApi, Result};
///
/// async fn first_trash_payload(api: &dyn PhotosApi) -> Result<serde_json::Value> {
///     api.trash_page(None).await
/// }
/// ```
#[async_trait]
pub trait PhotosApi: Send + Sync {
    /// One page of the main library timeline.
    async fn timeline_page(&self, cursor: Option<&str>) -> Result<Value>;

    /// One page of the albums listing.
    async fn albums_page(&self, cursor: Option<&str>) -> Result<Value>;

    /// One page of the shared-links listing.
    async fn shared_links_page(&self, cursor: Option<&str>) -> Result<Value>;

    /// One page of the items inside an album or shared link.
    async fn album_items_page(&self, album_media_key: &str, cursor: Option<&str>) -> Result<Value>;

    /// One page of the trash listing.
    async fn trash_page(&self, cursor: Option<&str>) -> Result<Value>;

    /// One page of the favorites listing (a canned search).
    async fn favorites_page(&self, cursor: Option<&str>) -> Result<Value>;

    /// One page of free-text search results.
    async fn search_page(&self, query: &str, cursor: Option<&str>) -> Result<Value>;

    /// One page of the locked-folder listing.
    async fn locked_folder_page(&self, cursor: Option<&str>) -> Result<Value>;

    /// Move the identified items into the locked folder.
    async fn move_to_locked_folder(&self, dedup_keys: &[String]) -> Result<Value>;

    /// Move the identified items out of the locked folder.
    async fn remove_from_locked_folder(&self, dedup_keys: &[String]) -> Result<Value>;

    /// Move the identified items to the trash.
    async fn move_to_trash(&self, dedup_keys: &[String]) -> Result<Value>;

    /// Restore the identified items from the trash.
    async fn restore_from_trash(&self, dedup_keys: &[String]) -> Result<Value>;

    /// Set or clear the archived flag on the identified items.
    async fn set_archive(&self, dedup_keys: &[String], archived: bool) -> Result<Value>;

    /// Set or clear the favorite flag on the identified items.
    async fn set_favorite(&self, dedup_keys: &[String], favorite: bool) -> Result<Value>;

    /// Create an album and return its media key.
    async fn create_album(&self, name: &str) -> Result<String>;

    /// Add items to an owned album.
    async fn add_items_to_album(&self, media_keys: &[String], album_media_key: &str) -> Result<Value>;

    /// Add items to a shared album.
    async fn add_items_to_shared_album(&self, media_keys: &[String], album_media_key: &str) -> Result<Value>;

    /// Media info for a batch of items.
    async fn batch_media_info(&self, media_keys: &[String]) -> Result<Value>;

    /// Extended info for a single item; the only endpoint distinguishing an
    /// empty description from a shadowed one.
    async fn item_info_ext(&self, media_key: &str) -> Result<Value>;

    /// Overwrite an item's description.
    async fn set_item_description(&self, dedup_key: &str, description: &str) -> Result<()>;
}

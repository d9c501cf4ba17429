//! Named bulk actions composed from the executor, the collector and the
//! decoder.
//!
//! Every action here is thin composition: derive a key sequence from the
//! input entities, pick the chunk size for the endpoint family, delegate to
//! the executor, and summarize. Failures inside a bulk run are logged and
//! counted, never raised — some items failing (already deleted, already
//! archived) must not block the rest of a human-facing batch.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde_json::Value;
use snapops_api::PhotosApi;
use snapops_batch::{CancelToken, ChunkOutcome, Executor, Limits, Run, collect_all};
use snapops_config::Settings;
use snapops_decode::{Album, AlbumItem, Decoded, ItemInfoExt, LockedFolderItem, MediaInfo, MediaItem, MediaRef,
                     Page, RpcId, SharedLink, TrashItem, decode};
use std::sync::Arc;

/// Appended to a backfilled description so the service does not discard it.
///
/// The service treats a description identical to the shadowing "other" field
/// as empty and silently drops it; ordinary whitespace is stripped, but a
/// zero-width space survives while remaining invisible.
const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Summary of one bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Chunks whose operation settled successfully.
    pub completed_chunks: usize,
    /// Chunks whose operation failed (logged and swallowed).
    pub failed_chunks: usize,
    /// Total result elements collected across completed chunks.
    pub results: usize,
}

/// Summary of a description backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backfill {
    /// Items whose description was written from the "other" field.
    pub updated: usize,
    /// Items left alone (description present, or nothing to copy).
    pub unchanged: usize,
    /// Items whose fetch or write failed (logged and swallowed).
    pub failed: usize,
}

/// Named bulk operations against the photo service.
///
/// Owns the opaque transport capability, the two concurrency budgets and
/// the run-state token. All listing operations drain their cursor to
/// completion; all bulk operations chunk, rate-limit and isolate failures.
pub struct Operations {
    api: Arc<dyn PhotosApi>,
    settings: Settings,
    executor: Executor,
    token: CancelToken,
}

impl Operations {
    pub fn new(api: Arc<dyn PhotosApi>, settings: Settings, token: CancelToken) -> Self {
        let executor = Executor::new(Limits {
            single: settings.max_concurrent_single_api_req,
            batch: settings.max_concurrent_batch_api_req,
        });
        Self { api, settings, executor, token }
    }

    /// The run-state token the operations poll.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    pub async fn get_all_timeline_items(&self) -> Result<Run<Vec<MediaItem>>> {
        let api = Arc::clone(&self.api);
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            async move {
                let raw = api.timeline_page(cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::Timeline, |decoded| match decoded {
                    Decoded::Timeline(timeline) => Some(timeline.page),
                    _ => None,
                }))
            }
        })
        .await
    }

    pub async fn get_all_albums(&self) -> Result<Run<Vec<Album>>> {
        let api = Arc::clone(&self.api);
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            async move {
                let raw = api.albums_page(cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::Albums, |decoded| match decoded {
                    Decoded::Albums(page) => Some(page),
                    _ => None,
                }))
            }
        })
        .await
    }

    pub async fn get_all_shared_links(&self) -> Result<Run<Vec<SharedLink>>> {
        let api = Arc::clone(&self.api);
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            async move {
                let raw = api.shared_links_page(cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::SharedLinks, |decoded| match decoded {
                    Decoded::SharedLinks(page) => Some(page),
                    _ => None,
                }))
            }
        })
        .await
    }

    /// All items of an album, addressed by its media key.
    pub async fn get_all_media_in_album(&self, album_media_key: &str) -> Result<Run<Vec<AlbumItem>>> {
        let api = Arc::clone(&self.api);
        let album_media_key = album_media_key.to_string();
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            let key = album_media_key.clone();
            async move {
                let raw = api.album_items_page(&key, cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::AlbumItems, |decoded| match decoded {
                    Decoded::AlbumItems(page) => Some(page),
                    _ => None,
                }))
            }
        })
        .await
    }

    /// Shared links page through the same endpoint family as albums.
    pub async fn get_all_media_in_shared_link(&self, link_media_key: &str) -> Result<Run<Vec<AlbumItem>>> {
        self.get_all_media_in_album(link_media_key).await
    }

    pub async fn get_all_trash_items(&self) -> Result<Run<Vec<TrashItem>>> {
        let api = Arc::clone(&self.api);
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            async move {
                let raw = api.trash_page(cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::Trash, |decoded| match decoded {
                    Decoded::Trash(page) => Some(page),
                    _ => None,
                }))
            }
        })
        .await
    }

    pub async fn get_all_favorite_items(&self) -> Result<Run<Vec<MediaItem>>> {
        let api = Arc::clone(&self.api);
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            async move {
                let raw = api.favorites_page(cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::Search, |decoded| match decoded {
                    Decoded::Search(page) => Some(page),
                    _ => None,
                }))
            }
        })
        .await
    }

    pub async fn get_all_search_items(&self, query: &str) -> Result<Run<Vec<MediaItem>>> {
        let api = Arc::clone(&self.api);
        let query = query.to_string();
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            let query = query.clone();
            async move {
                let raw = api.search_page(&query, cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::Search, |decoded| match decoded {
                    Decoded::Search(page) => Some(page),
                    _ => None,
                }))
            }
        })
        .await
    }

    pub async fn get_all_locked_folder_items(&self) -> Result<Run<Vec<LockedFolderItem>>> {
        let api = Arc::clone(&self.api);
        self.collect(move |cursor| {
            let api = Arc::clone(&api);
            async move {
                let raw = api.locked_folder_page(cursor.as_deref()).await?;
                Ok(page_of(&raw, RpcId::LockedFolder, |decoded| match decoded {
                    Decoded::LockedFolder(page) => Some(page),
                    _ => None,
                }))
            }
        })
        .await
    }

    // ------------------------------------------------------------------
    // Bulk actions
    // ------------------------------------------------------------------

    pub async fn move_to_trash<I: MediaRef>(&self, items: &[I]) -> Run<Report> {
        tracing::info!(count = items.len(), "Moving items to trash");
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.operation_size, dedup_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                async move { expect_sequence(api.move_to_trash(&chunk).await?) }
            })
            .await;
        summarize("move_to_trash", run)
    }

    pub async fn restore_from_trash<I: MediaRef>(&self, items: &[I]) -> Run<Report> {
        tracing::info!(count = items.len(), "Restoring items from trash");
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.operation_size, dedup_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                async move { expect_sequence(api.restore_from_trash(&chunk).await?) }
            })
            .await;
        summarize("restore_from_trash", run)
    }

    pub async fn move_to_locked_folder<I: MediaRef>(&self, items: &[I]) -> Run<Report> {
        tracing::info!(count = items.len(), "Moving items to locked folder");
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.locked_folder_op_size, dedup_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                async move { expect_sequence(api.move_to_locked_folder(&chunk).await?) }
            })
            .await;
        summarize("move_to_locked_folder", run)
    }

    pub async fn remove_from_locked_folder<I: MediaRef>(&self, items: &[I]) -> Run<Report> {
        tracing::info!(count = items.len(), "Moving items out of locked folder");
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.locked_folder_op_size, dedup_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                async move { expect_sequence(api.remove_from_locked_folder(&chunk).await?) }
            })
            .await;
        summarize("remove_from_locked_folder", run)
    }

    /// Archive every item not already archived.
    ///
    /// Items with an unknown archived state are attempted; the endpoint
    /// tolerates redundant flags. When the filter leaves nothing to do the
    /// network is not touched at all.
    pub async fn send_to_archive(&self, items: &[MediaItem]) -> Run<Report> {
        tracing::info!(count = items.len(), "Sending items to archive");
        let pending: Vec<&MediaItem> = items.iter().filter(|item| item.is_archived != Some(true)).collect();
        if pending.is_empty() {
            tracing::info!("All target items are already archived");
            return Run::Complete(Report::default());
        }
        self.set_archive_flag(&pending, true).await
    }

    /// Unarchive every item not already out of the archive.
    pub async fn un_archive(&self, items: &[MediaItem]) -> Run<Report> {
        tracing::info!(count = items.len(), "Removing items from archive");
        let pending: Vec<&MediaItem> = items.iter().filter(|item| item.is_archived != Some(false)).collect();
        if pending.is_empty() {
            tracing::info!("All target items are not archived");
            return Run::Complete(Report::default());
        }
        self.set_archive_flag(&pending, false).await
    }

    async fn set_archive_flag(&self, items: &[&MediaItem], archived: bool) -> Run<Report> {
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.operation_size, dedup_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                async move { expect_sequence(api.set_archive(&chunk, archived).await?) }
            })
            .await;
        summarize("set_archive", run)
    }

    /// Mark every item not already favorite.
    pub async fn set_as_favorite(&self, items: &[MediaItem]) -> Run<Report> {
        tracing::info!(count = items.len(), "Setting items as favorite");
        let pending: Vec<&MediaItem> = items.iter().filter(|item| item.is_favorite != Some(true)).collect();
        if pending.is_empty() {
            tracing::info!("All target items are already favorite");
            return Run::Complete(Report::default());
        }
        self.set_favorite_flag(&pending, true).await
    }

    /// Unmark every item not already outside the favorites.
    pub async fn un_favorite(&self, items: &[MediaItem]) -> Run<Report> {
        tracing::info!(count = items.len(), "Removing items from favorites");
        let pending: Vec<&MediaItem> = items.iter().filter(|item| item.is_favorite != Some(false)).collect();
        if pending.is_empty() {
            tracing::info!("All target items are not favorite");
            return Run::Complete(Report::default());
        }
        self.set_favorite_flag(&pending, false).await
    }

    async fn set_favorite_flag(&self, items: &[&MediaItem], favorite: bool) -> Run<Report> {
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.operation_size, dedup_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                async move { expect_sequence(api.set_favorite(&chunk, favorite).await?) }
            })
            .await;
        summarize("set_favorite", run)
    }

    /// Add items to an album, via the shared-album endpoint when the target
    /// album is shared.
    pub async fn add_to_existing_album<I: MediaRef>(&self, items: &[I], album: &Album) -> Run<Report> {
        tracing::info!(
            count = items.len(),
            album = album.name.as_deref().unwrap_or("<unnamed>"),
            "Adding items to album"
        );
        let Some(album_key) = album.media_key().map(str::to_string) else {
            tracing::warn!("Target album has no media key; nothing to do");
            return Run::Complete(Report::default());
        };
        let shared = album.is_shared;
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.operation_size, media_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                let album_key = album_key.clone();
                async move {
                    let raw = if shared {
                        api.add_items_to_shared_album(&chunk, &album_key).await?
                    } else {
                        api.add_items_to_album(&chunk, &album_key).await?
                    };
                    expect_sequence(raw)
                }
            })
            .await;
        summarize("add_to_existing_album", run)
    }

    /// Create an album, then add the items to it.
    ///
    /// # Errors
    /// Album creation happens outside a bulk run, so its transport failure
    /// is raised rather than swallowed.
    pub async fn add_to_new_album<I: MediaRef>(&self, items: &[I], album_name: &str) -> Result<Run<Report>> {
        tracing::info!(album = album_name, "Creating new album");
        let media_key = self.api.create_album(album_name).await.or_raise(|| ErrorKind::Api)?;
        let album = Album {
            product_id: Some(media_key),
            name: Some(album_name.to_string()),
            is_shared: false,
            ..Album::default()
        };
        Ok(self.add_to_existing_album(items, &album).await)
    }

    /// Media info for the given items, fetched in chunks.
    pub async fn get_batch_media_info<I: MediaRef>(&self, items: &[I]) -> Run<Vec<MediaInfo>> {
        tracing::info!(count = items.len(), "Getting items' media info");
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, self.settings.info_size, media_keys(items), move |chunk| {
                let api = Arc::clone(&api);
                async move {
                    let raw = api.batch_media_info(&chunk).await?;
                    match decode(&raw, RpcId::BatchMediaInfo) {
                        Some(Decoded::BatchMediaInfo(infos)) => Ok::<_, snapops_api::Error>(infos),
                        _ => Ok(Vec::new()),
                    }
                }
            })
            .await;
        run.map(|outcomes| {
            outcomes
                .into_iter()
                .flat_map(|outcome| match outcome {
                    ChunkOutcome::Completed(infos) => infos,
                    ChunkOutcome::Failed { items, error } => {
                        tracing::error!(items, %error, "Media info chunk failed; continuing");
                        Vec::new()
                    }
                })
                .collect()
        })
    }

    /// Copy the shadowing "other" field into the empty description of each
    /// item, one item at a time.
    ///
    /// This is deliberately sequential per item (chunk size 1, single-item
    /// budget): the extended-info endpoint is the only one that tells a
    /// truly empty description apart from one shadowed by the "other"
    /// field, and it takes a single media key. The batch info endpoint
    /// cannot be used to pre-filter, since it reports the shadowing value
    /// as the description.
    pub async fn set_descriptions_from_other<I: MediaRef>(&self, items: &[I]) -> Run<Backfill> {
        tracing::info!(count = items.len(), "Setting empty descriptions from 'Other' field");
        let pairs: Vec<(String, String)> = items
            .iter()
            .filter_map(|item| Some((item.media_key()?.to_string(), item.dedup_key()?.to_string())))
            .collect();
        let api = Arc::clone(&self.api);
        let run = self
            .executor
            .execute(&self.token, 1, pairs, move |chunk| {
                let api = Arc::clone(&api);
                async move {
                    let mut updated = Vec::with_capacity(chunk.len());
                    for (media_key, dedup_key) in chunk {
                        let raw = api.item_info_ext(&media_key).await?;
                        let info = match decode(&raw, RpcId::ItemInfo) {
                            Some(Decoded::ItemInfo(info)) => info,
                            _ => ItemInfoExt::default(),
                        };
                        updated.push(backfill_one(&*api, &dedup_key, &info).await?);
                    }
                    Ok::<_, snapops_api::Error>(updated)
                }
            })
            .await;
        let backfill = run.map(|outcomes| {
            let mut summary = Backfill::default();
            for outcome in outcomes {
                match outcome {
                    ChunkOutcome::Completed(flags) => {
                        for flag in flags {
                            if flag {
                                summary.updated += 1;
                            } else {
                                summary.unchanged += 1;
                            }
                        }
                    }
                    ChunkOutcome::Failed { items, error } => {
                        summary.failed += items;
                        tracing::error!(items, %error, "Description backfill failed for item; continuing");
                    }
                }
            }
            summary
        });
        if let Run::Complete(summary) = &backfill {
            tracing::info!(updated = summary.updated, "Set descriptions from 'Other' field");
        }
        backfill
    }

    async fn collect<T, F, Fut>(&self, fetch: F) -> Result<Run<Vec<T>>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = snapops_api::Result<(Vec<T>, Option<String>)>>,
    {
        collect_all(&self.token, fetch).await.or_raise(|| ErrorKind::Api)
    }
}

/// Write the description when it is empty and the "other" field is not.
async fn backfill_one(api: &dyn PhotosApi, dedup_key: &str, info: &ItemInfoExt) -> snapops_api::Result<bool> {
    let description_is_empty = info.description_full.as_deref().is_none_or(str::is_empty);
    let Some(other) = info.other.as_deref().filter(|other| !other.is_empty()) else {
        return Ok(false);
    };
    if !description_is_empty {
        return Ok(false);
    }
    api.set_item_description(dedup_key, &format!("{other}{ZERO_WIDTH_SPACE}")).await?;
    Ok(true)
}

/// The action result of every mutation endpoint is an ordered sequence;
/// anything else is the semantic-failure case of the old success predicate.
fn expect_sequence(value: Value) -> snapops_api::Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        _ => exn::bail!(snapops_api::ErrorKind::UnexpectedShape),
    }
}

fn page_of<T>(
    raw: &Value,
    rpc: RpcId,
    extract: impl FnOnce(Decoded) -> Option<Page<T>>,
) -> (Vec<T>, Option<String>) {
    decode(raw, rpc).and_then(extract).map(Page::into_parts).unwrap_or((Vec::new(), None))
}

fn dedup_keys<I: MediaRef>(items: &[I]) -> Vec<String> {
    items.iter().filter_map(|item| item.dedup_key().map(str::to_string)).collect()
}

fn media_keys<I: MediaRef>(items: &[I]) -> Vec<String> {
    items.iter().filter_map(|item| item.media_key().map(str::to_string)).collect()
}

fn summarize(action: &'static str, run: Run<Vec<ChunkOutcome<Value, snapops_api::Error>>>) -> Run<Report> {
    run.map(|outcomes| {
        let mut report = Report::default();
        for outcome in outcomes {
            match outcome {
                ChunkOutcome::Completed(results) => {
                    report.completed_chunks += 1;
                    report.results += results.len();
                }
                ChunkOutcome::Failed { items, error } => {
                    report.failed_chunks += 1;
                    tracing::error!(action, items, %error, "Chunk operation failed; continuing");
                }
            }
        }
        report
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use snapops_api::{ErrorKind as ApiErrorKind, MockApi};

    fn media_item(id: &str) -> MediaItem {
        MediaItem {
            product_id: Some(format!("p-{id}")),
            media_id: Some(format!("d-{id}")),
            ..MediaItem::default()
        }
    }

    fn settings() -> Settings {
        Settings {
            max_concurrent_single_api_req: 2,
            max_concurrent_batch_api_req: 2,
            operation_size: 2,
            info_size: 2,
            locked_folder_op_size: 2,
        }
    }

    fn operations(api: MockApi) -> (Operations, Arc<MockApi>) {
        let api = Arc::new(api);
        let ops = Operations::new(Arc::clone(&api) as Arc<dyn PhotosApi>, settings(), CancelToken::new());
        (ops, api)
    }

    #[tokio::test]
    async fn move_to_trash_chunks_by_operation_size() {
        let (ops, api) = operations(MockApi::new());
        let items = [media_item("1"), media_item("2"), media_item("3")];
        let run = ops.move_to_trash(&items).await;
        let report = run.into_complete().unwrap();
        assert_eq!(report.completed_chunks, 2);
        assert_eq!(report.failed_chunks, 0);
        assert_eq!(report.results, 3);
        let mut chunks: Vec<Vec<String>> = api.calls_to("move_to_trash").into_iter().map(|call| call.keys).collect();
        chunks.sort();
        assert_eq!(chunks, vec![vec!["d-1".to_string(), "d-2".to_string()], vec!["d-3".to_string()]]);
    }

    #[tokio::test]
    async fn one_failed_chunk_is_reported_not_raised() {
        let api = MockApi::new().with_failure("move_to_trash", ApiErrorKind::Transport);
        let (ops, api) = operations(api);
        let items = [media_item("1"), media_item("2"), media_item("3"), media_item("4")];
        let report = ops.move_to_trash(&items).await.into_complete().unwrap();
        assert_eq!(report.failed_chunks, 1);
        assert_eq!(report.completed_chunks, 1);
        assert_eq!(report.results, 2, "the surviving chunk's results outlive the failed chunk");
        assert_eq!(api.calls_to("move_to_trash").len(), 2);
    }

    #[tokio::test]
    async fn non_sequence_action_result_counts_as_failure() {
        let api = MockApi::new().with_page("restore_from_trash", json!({"status": "nope"}));
        let (ops, _api) = operations(api);
        let items = [media_item("1")];
        let report = ops.restore_from_trash(&items).await.into_complete().unwrap();
        assert_eq!(report.failed_chunks, 1);
        assert_eq!(report.results, 0);
    }

    #[tokio::test]
    async fn cancelled_token_issues_no_operations() {
        let (ops, api) = operations(MockApi::new());
        ops.token().cancel();
        let items = [media_item("1"), media_item("2")];
        assert!(ops.move_to_trash(&items).await.is_cancelled());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn archive_skips_items_already_archived() {
        let (ops, api) = operations(MockApi::new());
        let mut archived = media_item("1");
        archived.is_archived = Some(true);
        let unknown = media_item("2");
        let mut fresh = media_item("3");
        fresh.is_archived = Some(false);
        let report = ops.send_to_archive(&[archived, unknown, fresh]).await.into_complete().unwrap();
        assert_eq!(report.results, 2);
        let calls = api.calls_to("set_archive");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].keys, vec!["d-2", "d-3"], "unknown archive state is attempted");
        assert_eq!(calls[0].arg.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn archive_with_nothing_to_do_touches_no_endpoint() {
        let (ops, api) = operations(MockApi::new());
        let mut item = media_item("1");
        item.is_archived = Some(true);
        let report = ops.send_to_archive(&[item]).await.into_complete().unwrap();
        assert_eq!(report, Report::default());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unfavorite_filters_on_the_opposite_flag() {
        let (ops, api) = operations(MockApi::new());
        let mut favorite = media_item("1");
        favorite.is_favorite = Some(true);
        let mut not_favorite = media_item("2");
        not_favorite.is_favorite = Some(false);
        ops.un_favorite(&[favorite, not_favorite]).await.into_complete().unwrap();
        let calls = api.calls_to("set_favorite");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].keys, vec!["d-1"]);
        assert_eq!(calls[0].arg.as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn album_endpoint_follows_shared_flag() {
        let (ops, api) = operations(MockApi::new());
        let items = [media_item("1")];
        let owned = Album { product_id: Some("alb-1".into()), ..Album::default() };
        ops.add_to_existing_album(&items, &owned).await.into_complete().unwrap();
        let shared = Album { product_id: Some("alb-2".into()), is_shared: true, ..Album::default() };
        ops.add_to_existing_album(&items, &shared).await.into_complete().unwrap();
        let owned_calls = api.calls_to("add_items_to_album");
        assert_eq!(owned_calls.len(), 1);
        assert_eq!(owned_calls[0].keys, vec!["p-1"], "album membership uses media keys");
        assert_eq!(owned_calls[0].arg.as_deref(), Some("alb-1"));
        let shared_calls = api.calls_to("add_items_to_shared_album");
        assert_eq!(shared_calls.len(), 1);
        assert_eq!(shared_calls[0].arg.as_deref(), Some("alb-2"));
    }

    #[tokio::test]
    async fn add_to_new_album_creates_then_adds() {
        let api = MockApi::new().with_page("create_album", json!("fresh-album"));
        let (ops, api) = operations(api);
        let items = [media_item("1"), media_item("2")];
        ops.add_to_new_album(&items, "Holiday").await.unwrap().into_complete().unwrap();
        let created = api.calls_to("create_album");
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].arg.as_deref(), Some("Holiday"));
        let added = api.calls_to("add_items_to_album");
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].arg.as_deref(), Some("fresh-album"));
    }

    #[tokio::test]
    async fn batch_media_info_decodes_each_chunk() {
        let api = MockApi::new()
            .with_page("batch_media_info", json!([["p-1", [null, null, "hello", "a.jpg"]]]))
            .with_page("batch_media_info", json!([["p-3", [null, null, null, "b.jpg"]]]));
        let (ops, _api) = operations(api);
        let items = [media_item("1"), media_item("2"), media_item("3")];
        let infos = ops.get_batch_media_info(&items).await.into_complete().unwrap();
        assert_eq!(infos.len(), 2);
        let mut names: Vec<&str> = infos.iter().filter_map(|info| info.file_name.as_deref()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[tokio::test]
    async fn backfill_writes_other_plus_zero_width_space() {
        let api = MockApi::new()
            .with_info_ext("p-1", json!([["p-1", null, "a.jpg", null, null, null, {"396644657": ["x"]}]]))
            .with_info_ext("p-2", json!([["p-2", "already set", "b.jpg"]]));
        let (ops, api) = operations(api);
        let items = [media_item("1"), media_item("2")];
        let summary = ops.set_descriptions_from_other(&items).await.into_complete().unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.failed, 0);
        let writes = api.calls_to("set_item_description");
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].keys, vec!["d-1"]);
        assert_eq!(writes[0].arg.as_deref(), Some("x\u{200B}"));
    }

    #[tokio::test]
    async fn backfill_failure_is_counted_not_raised() {
        let api = MockApi::new()
            .with_info_ext("p-1", json!([["p-1", null, "a.jpg", null, null, null, {"396644657": ["y"]}]]))
            .with_info_ext("p-2", json!([["p-2", null, "b.jpg", null, null, null, {"396644657": ["z"]}]]))
            .with_failure("set_item_description", ApiErrorKind::Transport);
        let (ops, _api) = operations(api);
        let items = [media_item("1"), media_item("2")];
        let summary = ops.set_descriptions_from_other(&items).await.into_complete().unwrap();
        assert_eq!(summary.failed, 1, "the item whose write failed is counted, not raised");
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 0);
    }

    #[tokio::test]
    async fn albums_listing_drains_the_cursor() {
        let api = MockApi::new()
            .with_page(
                "albums_page",
                json!([[["alb-1", null, null, null, null, null, ["id-1"], {"72930366": [null, "One", null, 1]}]],
                       "cursor-2"]),
            )
            .with_page(
                "albums_page",
                json!([[["alb-2", null, null, null, null, null, ["id-2"], {"72930366": [null, "Two", null, 2, true]}]],
                       null]),
            );
        let (ops, api) = operations(api);
        let albums = ops.get_all_albums().await.unwrap().into_complete().unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].name.as_deref(), Some("One"));
        assert!(!albums[0].is_shared);
        assert!(albums[1].is_shared);
        let calls = api.calls_to("albums_page");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].arg, None);
        assert_eq!(calls[1].arg.as_deref(), Some("cursor-2"));
    }

    #[tokio::test]
    async fn listing_transport_failure_propagates() {
        let api = MockApi::new().with_failure("trash_page", ApiErrorKind::Transport);
        let (ops, _api) = operations(api);
        assert!(ops.get_all_trash_items().await.is_err());
    }

    #[tokio::test]
    async fn locked_folder_listing_uses_inverted_page_shape() {
        let api = MockApi::new()
            .with_page("locked_folder_page", json!(["more", [["p-9", null, 5, "d-9"]]]))
            .with_page("locked_folder_page", json!([null, [["p-8", null, 6, "d-8"]]]));
        let (ops, _api) = operations(api);
        let items = ops.get_all_locked_folder_items().await.unwrap().into_complete().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].media_id.as_deref(), Some("d-9"));
    }

    #[tokio::test]
    async fn cancelled_listing_returns_cancelled_not_empty() {
        let (ops, api) = operations(MockApi::new());
        ops.token().cancel();
        let run = ops.get_all_trash_items().await.unwrap();
        assert!(run.is_cancelled());
        assert!(api.calls().is_empty());
    }
}

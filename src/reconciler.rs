//! Selection and submission of new tracks.
//!
//! A run diffs the playable library against the queued record, draws the
//! requested number of tracks at random without replacement, pushes them to
//! the playback queue in draw order and writes the grown record back. When
//! every playable track has been queued the record starts over, both at the
//! beginning of a run and in the middle of a draw.

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::{
    errors::ShuffleError,
    info,
    management::{
        BlobStore, PlayableTracksManager, QueuedTracksManager, TrackSet, ensure_active,
    },
    spotify::LibraryClient,
    success,
    types::TrackId,
    warning,
};

/// Submissions between two progress messages.
const PROGRESS_INTERVAL: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Forget every previously queued track before anything else happens.
    pub purge_requested: bool,
    /// Rebuild the playable snapshot even if it is still fresh.
    pub force_refresh: bool,
    /// Number of tracks to add to the playback queue.
    pub to_enqueue: usize,
}

/// Outcome of [`select_tracks`].
#[derive(Debug, Clone)]
pub struct Selection {
    /// Drawn tracks in draw order.
    pub batch: Vec<TrackId>,
    /// The queued record to persist after submitting the batch.
    pub queued: TrackSet,
    /// Size of the candidate pool before the first draw.
    pub candidates: usize,
    /// Whether the queued record was reset because nothing was left to draw.
    pub reset: bool,
    /// How often the pool ran dry mid-draw and was refilled.
    pub recycles: usize,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub submitted: Vec<TrackId>,
    pub queued_total: usize,
    pub reset: bool,
    pub recycles: usize,
}

/// Draws `count` tracks from `playable` that are not in `queued`.
///
/// Tracks are picked uniformly at random and removed from the pool by
/// swapping them with its last element. If `queued` already covers the whole
/// library the queued record is reset and every playable track becomes a
/// candidate again. If the pool runs dry before `count` draws it is refilled
/// with every playable track; a track can therefore appear more than once in
/// the batch once `count` exceeds the number of candidates.
///
/// Pure apart from `rng`: nothing is printed or stored.
///
/// # Errors
///
/// [`ShuffleError::Selection`] when tracks are requested from an empty
/// library.
pub fn select_tracks<R>(
    playable: &TrackSet,
    queued: &TrackSet,
    count: usize,
    rng: &mut R,
) -> Result<Selection, ShuffleError>
where
    R: Rng,
{
    let mut accumulated = queued.clone();
    let mut pool = playable.difference(&accumulated).to_vec();
    let mut reset = false;

    if pool.is_empty() {
        accumulated = TrackSet::new();
        pool = playable.to_vec();
        reset = true;
    }

    if count > 0 && pool.is_empty() {
        return Err(ShuffleError::Selection { requested: count });
    }

    let candidates = pool.len();
    let mut batch = Vec::with_capacity(count);
    let mut recycles = 0;

    while batch.len() < count {
        if pool.is_empty() {
            // every playable track is in `accumulated` by now, either queued
            // before this run or drawn from the pool
            pool = playable.to_vec();
            recycles += 1;
        }

        let index = rng.random_range(0..pool.len());
        let selected = pool.swap_remove(index);
        accumulated.insert(selected.clone());
        batch.push(selected);
    }

    Ok(Selection {
        batch,
        queued: accumulated,
        candidates,
        reset,
        recycles,
    })
}

/// Drives one shuffle run against a library client and a blob store.
pub struct Reconciler<'a> {
    client: &'a dyn LibraryClient,
    store: &'a dyn BlobStore,
    cancel: CancellationToken,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        client: &'a dyn LibraryClient,
        store: &'a dyn BlobStore,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            store,
            cancel,
        }
    }

    /// Runs the whole shuffle: purge, load, select, submit, persist.
    ///
    /// The steps run strictly in order:
    /// 1. **Purge**: with `purge_requested` the queued record is emptied
    ///    right away, in its own write
    /// 2. **Playable Tracks**: loaded from the cache or the live library
    /// 3. **Queued Tracks**: loaded from the store, absent means empty
    /// 4. **Selection**: see [`select_tracks`]
    /// 5. **Submission**: one queue call per track in draw order
    /// 6. **Persist**: the grown queued record, also when nothing was drawn
    ///
    /// # Errors
    ///
    /// Any failure aborts the run. A failed or cancelled submission leaves the
    /// remaining tracks unsubmitted and the queued record untouched, apart from
    /// an already committed purge.
    pub async fn reconcile(
        &self,
        options: &ReconcileOptions,
    ) -> Result<ReconcileReport, ShuffleError> {
        let queued_mgr = QueuedTracksManager::new(self.store, self.cancel.clone());

        if options.purge_requested {
            queued_mgr.purge().await?;
            success!("All enqueued tracks have been purged.");
        }

        let playable = PlayableTracksManager::new(self.client, self.store, self.cancel.clone())
            .get_all_playable_tracks(options.force_refresh)
            .await?;
        info!("Found {} playable tracks in total.", playable.len());

        let queued = queued_mgr.load().await?;
        info!("Found {} queued tracks.", queued.len());

        let selection = select_tracks(&playable, &queued, options.to_enqueue, &mut rand::rng())?;
        if selection.reset {
            warning!("All tracks were played! Queued tracks will be reset.");
        } else {
            info!(
                "Found {} playable tracks that are not queued.",
                selection.candidates
            );
        }
        if selection.recycles > 0 {
            info!(
                "All tracks were played! Playable tracks were reused {} time(s).",
                selection.recycles
            );
        }

        self.submit(&selection.batch).await?;

        queued_mgr.persist(&selection.queued).await?;
        success!("Enqueued {} tracks successfully.", selection.batch.len());

        Ok(ReconcileReport {
            queued_total: selection.queued.len(),
            submitted: selection.batch,
            reset: selection.reset,
            recycles: selection.recycles,
        })
    }

    async fn submit(&self, batch: &[TrackId]) -> Result<(), ShuffleError> {
        for (i, track) in batch.iter().enumerate() {
            let position = i + 1;
            ensure_active(&self.cancel)?;

            if let Err(source) = self.client.submit_to_queue(track).await {
                return Err(ShuffleError::Submit {
                    track: track.clone(),
                    position,
                    source,
                });
            }

            if position % PROGRESS_INTERVAL == 0 {
                info!("Enqueued {}/{} tracks...", position, batch.len());
            }
        }
        Ok(())
    }
}

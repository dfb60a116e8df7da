use std::sync::mpsc::Sender;
use std::thread;

use crate::app::{Surface, SurfaceState};
use crate::catalog::{CatalogClient, ClientError, ResultSet, TrackQuery};

/// Outcome of one background fetch, tagged for staleness checks.
pub struct FetchResult {
    pub surface: Surface,
    pub generation: u64,
    pub outcome: Result<ResultSet, ClientError>,
}

/// Issue a fetch for `page` of `surface`, recording the new generation on
/// its state. The request runs on a short-lived worker thread; the result
/// comes back on `results_tx`.
pub fn request_fetch(
    state: &mut SurfaceState,
    client: &CatalogClient,
    results_tx: &Sender<FetchResult>,
    surface: Surface,
    page: usize,
    page_size: usize,
) {
    let generation = state.begin_fetch(page);

    let mut query = TrackQuery::new(state.order, state.page, page_size);
    let search = state.query.trim();
    if !search.is_empty() {
        query.search = Some(search.to_string());
    }

    spawn_fetch(client, results_tx, surface, generation, query);
}

fn spawn_fetch(
    client: &CatalogClient,
    results_tx: &Sender<FetchResult>,
    surface: Surface,
    generation: u64,
    query: TrackQuery,
) {
    let client = client.clone();
    let tx = results_tx.clone();
    thread::spawn(move || {
        let outcome = client
            .fetch(&query)
            .map(|tracks| ResultSet::new(tracks, query.page, query.page_size));
        // The loop may be gone already; a dead channel just drops the result.
        let _ = tx.send(FetchResult {
            surface,
            generation,
            outcome,
        });
    });
}

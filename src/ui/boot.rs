use std::sync::Arc;
use std::time::Duration;

use crate::adapters::backend::InspectionApi;
use crate::adapters::page::{GALLERY_GRID_ID, Page};
use crate::ui::gallery::{GalleryLoad, GalleryLoader};
use crate::ui::live_feed::{Activation, LivePoller};

pub struct BootReport<P, A> {
    /// Keeps the live poll task alive; dropping it stops polling.
    pub poller: LivePoller<P, A>,
    pub live: Activation,
    pub gallery: Option<GalleryLoad>,
}

/// Page-ready entry point shared by every page type: the live poller is always
/// offered the page, the gallery only runs when the page has a grid.
pub async fn boot<P, A>(page: Arc<P>, api: Arc<A>, poll_interval: Duration) -> BootReport<P, A>
where
    P: Page,
    A: InspectionApi,
{
    let mut poller = LivePoller::new(Arc::clone(&page), Arc::clone(&api), poll_interval);
    let live = poller.start();

    let gallery = if page.has_element(GALLERY_GRID_ID) {
        Some(GalleryLoader::new(page, api).load().await)
    } else {
        None
    };

    tracing::info!(
        live_active = live.is_active(),
        gallery_loaded = gallery.is_some(),
        "page boot completed"
    );

    BootReport {
        poller,
        live,
        gallery,
    }
}

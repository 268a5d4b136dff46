use std::sync::Arc;

use crate::adapters::backend::{ApiError, InspectionApi};
use crate::adapters::page::{GALLERY_GRID_ID, GALLERY_STATUS_ID, Page};
use crate::domain::inspection::{InspectionEvent, parse_items, presigned_url};
use crate::domain::query::{GALLERY_LIMIT, GALLERY_PAGE, GalleryFilter};
use crate::ui::messages;
use crate::ui::render::{gallery_error, gallery_grid};

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub event: InspectionEvent,
    pub image_src: Option<String>,
}

impl GalleryCard {
    pub fn new(event: InspectionEvent) -> Self {
        let image_src = event.overlay_url.clone();
        Self { event, image_src }
    }

    /// The storage key to presign, if this card still shows a placeholder.
    pub fn presign_key(&self) -> Option<&str> {
        if self.image_src.is_some() {
            return None;
        }
        self.event
            .overlay_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryLoad {
    Inactive,
    Loaded {
        cards: Vec<GalleryCard>,
        resolved: usize,
    },
    Failed(String),
}

pub struct GalleryLoader<P, A> {
    page: Arc<P>,
    api: Arc<A>,
}

impl<P, A> GalleryLoader<P, A>
where
    P: Page,
    A: InspectionApi,
{
    pub fn new(page: Arc<P>, api: Arc<A>) -> Self {
        Self { page, api }
    }

    pub fn is_available(&self) -> bool {
        self.page.has_element(GALLERY_GRID_ID) && self.page.has_element(GALLERY_STATUS_ID)
    }

    /// Loads with the `product`/`station` filters of the hosting page.
    pub async fn load(&self) -> GalleryLoad {
        let filter = GalleryFilter::from_query(self.page.query());
        self.load_with(&filter).await
    }

    pub async fn load_with(&self, filter: &GalleryFilter) -> GalleryLoad {
        if !self.is_available() {
            return GalleryLoad::Inactive;
        }

        self.page.set_text(GALLERY_STATUS_ID, messages::LOADING);

        let mut cards = match self.fetch_cards(filter).await {
            Ok(cards) => cards,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    product = filter.product.as_deref().unwrap_or(""),
                    station = filter.station.as_deref().unwrap_or(""),
                    "defect gallery load failed"
                );
                let message = error.to_string();
                self.page.set_text(GALLERY_STATUS_ID, messages::GALLERY_ERROR);
                self.page.set_html(GALLERY_GRID_ID, &gallery_error(&message));
                return GalleryLoad::Failed(message);
            }
        };

        self.page.set_html(GALLERY_GRID_ID, &gallery_grid(&cards));
        self.page.set_text(GALLERY_STATUS_ID, messages::OK);

        let resolved = self.resolve_images(&mut cards).await;
        tracing::info!(cards = cards.len(), resolved, "defect gallery loaded");

        GalleryLoad::Loaded { cards, resolved }
    }

    async fn fetch_cards(&self, filter: &GalleryFilter) -> Result<Vec<GalleryCard>, ApiError> {
        let body = self
            .api
            .defects(filter, GALLERY_LIMIT, GALLERY_PAGE)
            .await?;
        Ok(parse_items(&body).into_iter().map(GalleryCard::new).collect())
    }

    /// Presigns placeholder cards one at a time, in render order, and
    /// re-renders the grid after each hit. Misses of any kind leave the
    /// placeholder in place and move on to the next card.
    pub async fn resolve_images(&self, cards: &mut [GalleryCard]) -> usize {
        let mut resolved = 0;

        for index in 0..cards.len() {
            let Some(key) = cards[index].presign_key().map(str::to_string) else {
                continue;
            };

            let url = match self.api.presign(&key).await {
                Ok(body) => presigned_url(&body),
                Err(error) => {
                    tracing::debug!(key = %key, error = %error, "presign request failed");
                    continue;
                }
            };

            let Some(url) = url else {
                tracing::debug!(key = %key, "presign response carried no url");
                continue;
            };

            cards[index].image_src = Some(url);
            resolved += 1;
            self.page.set_html(GALLERY_GRID_ID, &gallery_grid(cards));
        }

        resolved
    }
}

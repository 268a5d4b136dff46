use url::form_urlencoded;

pub const LIVE_LIMIT: u32 = 20;
pub const GALLERY_LIMIT: u32 = 30;
pub const GALLERY_PAGE: u32 = 1;
pub const FAIL_DECISION: &str = "FAIL";

pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Forwards every page parameter to the recent-events proxy and pins `limit`.
pub fn recent_query(page_query: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = parse_query(page_query)
        .into_iter()
        .filter(|(key, _)| key != "limit")
        .collect();
    pairs.push(("limit".to_string(), LIVE_LIMIT.to_string()));
    pairs
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFilter {
    pub product: Option<String>,
    pub station: Option<String>,
}

impl GalleryFilter {
    pub fn from_query(page_query: &str) -> Self {
        let pairs = parse_query(page_query);
        let pick = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            product: pick("product"),
            station: pick("station"),
        }
    }

    pub fn to_pairs(&self, limit: u32, page: u32) -> Vec<(String, String)> {
        let mut pairs = vec![("decision".to_string(), FAIL_DECISION.to_string())];
        if let Some(product) = &self.product {
            pairs.push(("product".to_string(), product.clone()));
        }
        if let Some(station) = &self.station {
            pairs.push(("station".to_string(), station.clone()));
        }
        pairs.push(("limit".to_string(), limit.to_string()));
        pairs.push(("page".to_string(), page.to_string()));
        pairs
    }
}

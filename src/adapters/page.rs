use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::ui::render::html_escape;

pub const LIVE_STATUS_ID: &str = "live-status";
pub const LIVE_BODY_ID: &str = "live-body";
pub const GALLERY_STATUS_ID: &str = "gallery-status";
pub const GALLERY_GRID_ID: &str = "gallery-grid";

/// The document surface the feed and gallery render into.
///
/// Writes to an element id the page does not carry are ignored.
pub trait Page: Send + Sync + 'static {
    fn has_element(&self, id: &str) -> bool;
    fn set_text(&self, id: &str, text: &str);
    fn set_html(&self, id: &str, html: &str);
    /// The hosting page's query string, without the leading `?`.
    fn query(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Live,
    Gallery,
    All,
}

impl PageKind {
    pub fn element_ids(self) -> &'static [&'static str] {
        match self {
            Self::Live => &[LIVE_STATUS_ID, LIVE_BODY_ID],
            Self::Gallery => &[GALLERY_STATUS_ID, GALLERY_GRID_ID],
            Self::All => &[LIVE_STATUS_ID, LIVE_BODY_ID, GALLERY_STATUS_ID, GALLERY_GRID_ID],
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "live" => Some(Self::Live),
            "gallery" | "defects" => Some(Self::Gallery),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Text(String),
    Html(String),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Content {
    fn inner_html(&self) -> String {
        match self {
            Self::Text(text) => html_escape(text),
            Self::Html(html) => html.clone(),
        }
    }
}

#[derive(Debug)]
pub struct MemoryPage {
    query: String,
    elements: Mutex<BTreeMap<String, Content>>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryPage {
    pub fn new(element_ids: &[&str], query: &str) -> Self {
        let elements = element_ids
            .iter()
            .map(|id| ((*id).to_string(), Content::default()))
            .collect();

        Self {
            query: query.strip_prefix('?').unwrap_or(query).to_string(),
            elements: Mutex::new(elements),
            snapshot_path: None,
        }
    }

    pub fn for_kind(kind: PageKind, query: &str) -> Self {
        Self::new(kind.element_ids(), query)
    }

    /// Rewrites `path` with the whole document after every mutation.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn text(&self, id: &str) -> Option<String> {
        match self.lock().get(id)? {
            Content::Text(text) => Some(text.clone()),
            Content::Html(_) => None,
        }
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.lock().get(id).map(Content::inner_html)
    }

    pub fn render_document(&self) -> String {
        render(&self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Content>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Holds the guard until the snapshot is on disk.
    fn replace(&self, id: &str, content: Content) {
        let mut elements = self.lock();
        let Some(slot) = elements.get_mut(id) else {
            tracing::trace!(element = id, "write to absent element ignored");
            return;
        };
        *slot = content;

        if let Some(path) = &self.snapshot_path
            && let Err(error) = write_snapshot(path, &render(&elements))
        {
            tracing::warn!(path = %path.display(), error = %error, "failed to write page snapshot");
        }
    }
}

fn render(elements: &BTreeMap<String, Content>) -> String {
    let mut document = String::from(
        "<!doctype html>\n<html lang=\"vi\"><head><meta charset=\"utf-8\"><title>AOI</title></head><body>\n",
    );
    for (id, content) in elements {
        let id_attr = html_escape(id);
        let inner = content.inner_html();
        if id == LIVE_BODY_ID {
            document.push_str(&format!(
                "<table class=\"table\"><tbody id=\"{id_attr}\">{inner}</tbody></table>\n"
            ));
        } else {
            document.push_str(&format!("<div id=\"{id_attr}\">{inner}</div>\n"));
        }
    }
    document.push_str("</body></html>\n");
    document
}

/// Stages next to `path`, then renames over it.
fn write_snapshot(path: &Path, document: &str) -> io::Result<()> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    fs::write(&staging, document)?;
    fs::rename(&staging, path)
}

impl Page for MemoryPage {
    fn has_element(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    fn set_text(&self, id: &str, text: &str) {
        self.replace(id, Content::Text(text.to_string()));
    }

    fn set_html(&self, id: &str, html: &str) {
        self.replace(id, Content::Html(html.to_string()));
    }

    fn query(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::{GALLERY_GRID_ID, LIVE_BODY_ID, LIVE_STATUS_ID, MemoryPage, Page, PageKind};

    #[test]
    fn page_kinds_expose_expected_elements() {
        let live = MemoryPage::for_kind(PageKind::Live, "");
        assert!(live.has_element(LIVE_STATUS_ID));
        assert!(live.has_element(LIVE_BODY_ID));
        assert!(!live.has_element(GALLERY_GRID_ID));

        assert_eq!(PageKind::parse(" Gallery "), Some(PageKind::Gallery));
        assert_eq!(PageKind::parse("defects"), Some(PageKind::Gallery));
        assert_eq!(PageKind::parse("kiosk"), None);
    }

    #[test]
    fn writes_to_absent_elements_are_ignored() {
        let page = MemoryPage::for_kind(PageKind::Live, "");
        page.set_html(GALLERY_GRID_ID, "<div>x</div>");
        assert_eq!(page.html(GALLERY_GRID_ID), None);
    }

    #[test]
    fn text_content_is_escaped_in_html_view() {
        let page = MemoryPage::for_kind(PageKind::Live, "?product=P1");
        page.set_text(LIVE_STATUS_ID, "<b>OK</b>");

        assert_eq!(page.query(), "product=P1");
        assert_eq!(page.text(LIVE_STATUS_ID).as_deref(), Some("<b>OK</b>"));
        assert_eq!(
            page.html(LIVE_STATUS_ID).as_deref(),
            Some("&lt;b&gt;OK&lt;/b&gt;")
        );

        page.set_html(LIVE_STATUS_ID, "<b>OK</b>");
        assert_eq!(page.text(LIVE_STATUS_ID), None);
    }

    #[test]
    fn snapshot_file_tracks_latest_document() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("page.html");
        let page = MemoryPage::for_kind(PageKind::Live, "").with_snapshot(&path);

        page.set_html(LIVE_BODY_ID, "<tr><td>row</td></tr>");
        page.set_text(LIVE_STATUS_ID, "OK");

        let written = std::fs::read_to_string(&path).expect("snapshot should exist");
        assert!(written.contains("<tbody id=\"live-body\"><tr><td>row</td></tr></tbody>"));
        assert!(written.contains("<div id=\"live-status\">OK</div>"));
    }

    #[test]
    fn concurrent_writers_leave_final_document_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("page.html");

        for round in 0..50 {
            let page = Arc::new(MemoryPage::for_kind(PageKind::All, "").with_snapshot(&path));
            let writers: Vec<_> = [LIVE_BODY_ID, GALLERY_GRID_ID]
                .into_iter()
                .map(|id| {
                    let page = Arc::clone(&page);
                    thread::spawn(move || {
                        for step in 0..20 {
                            page.set_html(id, &format!("<p>{id} {round} {step}</p>"));
                        }
                    })
                })
                .collect();
            for writer in writers {
                writer.join().expect("writer thread should finish");
            }

            let written = std::fs::read_to_string(&path).expect("snapshot should exist");
            assert_eq!(written, page.render_document(), "round {round}");
        }
        assert!(!dir.path().join("page.html.tmp").exists());
    }
}

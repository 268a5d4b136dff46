use crate::domain::inspection::{Decision, InspectionEvent};
use crate::domain::timestamp::format_timestamp;
use crate::ui::gallery::GalleryCard;
use crate::ui::messages;

const LIVE_COLUMNS: usize = 7;

pub fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for char in value.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(char),
        }
    }
    escaped
}

fn opt(value: Option<&str>) -> String {
    value.map(html_escape).unwrap_or_default()
}

fn defect_count(event: &InspectionEvent) -> String {
    event
        .defect_count
        .map(|count| count.to_string())
        .unwrap_or_default()
}

pub fn detail_href(event_id: &str) -> String {
    format!("/inspections/{}", urlencoding::encode(event_id))
}

fn detail_link(event: &InspectionEvent, class: &str) -> String {
    match event.event_id.as_deref() {
        Some(event_id) => format!(
            "<a{class} href=\"{}\">{}</a>",
            html_escape(&detail_href(event_id)),
            messages::VIEW_DETAIL
        ),
        None => "-".to_string(),
    }
}

pub fn decision_badge(decision: &Decision) -> String {
    format!(
        "<span class=\"badge {}\">{}</span>",
        decision.badge_class(),
        html_escape(decision.label())
    )
}

pub fn live_row(event: &InspectionEvent) -> String {
    let overlay = match event.overlay_url.as_deref() {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            html_escape(url),
            messages::OPEN_OVERLAY
        ),
        None => "-".to_string(),
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        html_escape(&format_timestamp(event.ts.as_deref())),
        opt(event.product_code.as_deref()),
        opt(event.station_id.as_deref()),
        decision_badge(&event.decision),
        defect_count(event),
        overlay,
        detail_link(event, ""),
    )
}

/// Builds the whole live table body; an empty feed becomes one info row.
pub fn live_rows(events: &[InspectionEvent]) -> String {
    if events.is_empty() {
        return format!(
            "<tr><td colspan=\"{LIVE_COLUMNS}\" class=\"text-secondary\">{}</td></tr>",
            messages::LIVE_EMPTY
        );
    }
    events.iter().map(live_row).collect()
}

pub fn gallery_card(card: &GalleryCard) -> String {
    let event = &card.event;
    let image = match card.image_src.as_deref() {
        Some(src) => format!(
            "<img class=\"card-img-top\" src=\"{}\" alt=\"overlay\" loading=\"lazy\">",
            html_escape(src)
        ),
        None => format!(
            "<div class=\"card-img-top placeholder-image text-secondary\">{}</div>",
            messages::NO_IMAGE
        ),
    };
    let summary = format!(
        "{} · {}",
        opt(event.product_code.as_deref()),
        opt(event.station_id.as_deref())
    );

    format!(
        "<div class=\"col\" data-event-id=\"{}\" data-overlay-key=\"{}\">\
<div class=\"card h-100\">{image}<div class=\"card-body\">\
<div class=\"d-flex justify-content-between\"><small>{}</small>{}</div>\
<div class=\"card-text\">{summary}</div>\
<div class=\"card-text\">{}: {}</div>\
{}</div></div></div>",
        opt(event.event_id.as_deref()),
        opt(event.overlay_key.as_deref()),
        html_escape(&format_timestamp(event.ts.as_deref())),
        decision_badge(&event.decision),
        messages::DEFECT_COUNT,
        defect_count(event),
        detail_link(event, " class=\"stretched-link\""),
    )
}

pub fn gallery_grid(cards: &[GalleryCard]) -> String {
    if cards.is_empty() {
        return format!(
            "<div class=\"text-secondary\">{}</div>",
            messages::GALLERY_EMPTY
        );
    }
    cards.iter().map(gallery_card).collect()
}

pub fn gallery_error(message: &str) -> String {
    format!("<div class=\"text-danger\">{}</div>", html_escape(message))
}

//! Operator-facing strings. The floor UI is Vietnamese; these are fixed and
//! not configurable.

pub const LOADING: &str = "Loading…";
pub const OK: &str = "OK";

pub const LIVE_EMPTY: &str = "Không có dữ liệu.";
pub const LIVE_RETRYING: &str = "Lỗi tải dữ liệu (tự thử lại)…";

pub const GALLERY_EMPTY: &str = "Không có lỗi nào.";
pub const GALLERY_ERROR: &str = "Lỗi";
pub const NO_IMAGE: &str = "Không có ảnh";
pub const DEFECT_COUNT: &str = "Số lỗi";

pub const OPEN_OVERLAY: &str = "Open";
pub const VIEW_DETAIL: &str = "View";

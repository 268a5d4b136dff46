pub mod boot;
pub mod gallery;
pub mod live_feed;
pub mod messages;
pub mod render;

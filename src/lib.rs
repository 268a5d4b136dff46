pub mod adapters;
pub mod app;
pub mod domain;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

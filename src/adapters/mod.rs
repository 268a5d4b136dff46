pub mod backend;
pub mod page;
pub mod replay;

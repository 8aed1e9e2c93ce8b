pub mod info;
pub mod merge;

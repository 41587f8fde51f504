pub mod chapter_name;
pub mod config;
pub mod context;
pub mod fs_utils;
pub mod logging;
pub mod title_id;

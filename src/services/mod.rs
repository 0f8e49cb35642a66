// Bookmark store services
// Services wrap the managers for callers: boundary operations, configuration, sample data.

pub mod bookmark_data_service;
pub mod sample_data;
pub mod settings_engine;

// Bookmark store managers
// Managers own the stateful operations over the open database: records, paging, search.

pub mod bookmark_manager;
pub mod pagination;
pub mod search;

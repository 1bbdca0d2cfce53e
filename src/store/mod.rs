pub mod json_store;
pub mod topic_cache;

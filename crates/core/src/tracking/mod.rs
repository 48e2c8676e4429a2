pub mod domain;
pub mod infrastructure;
pub mod multi_object_tracker;
pub mod tracker_config;
pub mod tracker_error;

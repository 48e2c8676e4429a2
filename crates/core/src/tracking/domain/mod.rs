pub mod associator;
pub mod feature_extractor;
pub mod lifecycle;
pub mod motion_model;
pub mod track_table;

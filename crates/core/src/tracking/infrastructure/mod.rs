pub mod distance;
pub mod histogram_feature_extractor;
pub mod parallel_feature_extractor;
pub mod uniform_feature_extractor;

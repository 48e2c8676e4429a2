pub mod bounding_box;
pub mod coco_labels;
pub mod constants;
pub mod detection;
pub mod frame;

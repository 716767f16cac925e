pub mod catalog;
pub mod focus;
pub mod geometry;
pub mod tour;

pub use catalog::{builtin_catalog, CatalogError, Region, RegionCatalog};
pub use focus::{
    approach, desired_camera_point, FocusOffset, DEFAULT_APPROACH_FRACTION, DEFAULT_FOCUS_OFFSET,
};
pub use geometry::{scene_distance, ScenePoint};
pub use tour::TourSchedule;

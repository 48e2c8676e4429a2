pub const DEFAULT_CAPACITY: usize = 20;
pub const DEFAULT_FEATURE_DIMENSION: usize = 10;

pub const DEFAULT_MIN_LIFE: u32 = 0;
pub const DEFAULT_MAX_LIFE: u32 = 5;

/// Nearest-track distance (pixels) below which a detection may match a track.
pub const DEFAULT_CLOSE_THRESHOLD: f64 = 100.0;
/// Minimum separation between the two nearest tracks for an unambiguous match.
pub const DEFAULT_GAP_THRESHOLD: f64 = 50.0;
/// Weight of center distance vs. feature distance; 1.0 is pure centroid matching.
pub const DEFAULT_CENTER_WEIGHT: f64 = 1.0;

/// Detector score a detection must exceed to reach the tracker.
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

/// Label value reserved for empty track slots.
pub const EMPTY_LABEL: u32 = 0;
/// Track ID held by free slots.
pub const UNASSIGNED_TRACK_ID: u32 = 0;

pub const CONFIG_DIR_NAME: &str = "objtrack";
pub const CONFIG_FILE_NAME: &str = "tracker.json";

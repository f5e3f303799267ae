/// Bytes per pixel; every frame in this crate is tightly-packed RGB24.
pub const RGB_CHANNELS: usize = 3;

/// Frames skipped before each sampled frame when no stride is configured.
pub const DEFAULT_SKIP_COUNT: usize = 4;

/// Lines steeper than this slope (in row-major coordinates) are never lanes.
pub const LANE_VERTICAL_SLOPE_THRESHOLD: f64 = 4.0;

/// Minimum side-to-side brightness contrast for a line to qualify as a lane edge.
pub const LANE_BRIGHTNESS_DIFFERENCE_THRESHOLD: f64 = 15.0;

/// The two lines of a lane pair must have contrast magnitudes within this bound.
pub const LANE_BRIGHTNESS_MATCH_TOLERANCE: f64 = 20.0;

/// Minimum intercept separation for two lines to be distinct lane candidates.
pub const LANE_MIN_INTERCEPT_SEPARATION: f64 = 5.0;

/// Weighted slope/intercept distance under which a candidate duplicates an
/// already accepted lane.
pub const LANE_DUPLICATE_DISTANCE: f64 = 20.0;

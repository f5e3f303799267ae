use crate::lanes::geometry::{Line, LineSegment, PointF};
use crate::shared::constants::{
    LANE_BRIGHTNESS_DIFFERENCE_THRESHOLD, LANE_BRIGHTNESS_MATCH_TOLERANCE,
    LANE_DUPLICATE_DISTANCE, LANE_MIN_INTERCEPT_SEPARATION, LANE_VERTICAL_SLOPE_THRESHOLD,
};
use crate::shared::frame::Frame;

/// Rows sampled on each side of a candidate line when measuring brightness.
const BRIGHTNESS_SAMPLE_RANGE: i64 = 10;

/// A matched pair of lane boundary lines and their angle bisector, in
/// row-major coordinates (row as abscissa, column as ordinate).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LanePair {
    pub left: Line,
    pub right: Line,
    pub bisector: Line,
}

/// Pairs detected line segments into up to two lane pairs.
///
/// Line detection itself is external; this consumes segments from any
/// detector together with the frame they came from, and applies the pairing
/// heuristics: near-vertical rejection, minimum separation, a far-away
/// vanishing point, duplicate suppression, and side-to-side brightness
/// contrast sampled from the frame.
pub struct LaneExtractor {
    frame_width: f64,
    frame_height: f64,
    min_segment_length: f64,
}

struct Candidate {
    line: Line,
    midpoint: PointF,
}

impl LaneExtractor {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width: frame_width as f64,
            frame_height: frame_height as f64,
            min_segment_length: frame_height as f64 / 20.0,
        }
    }

    /// Extracts up to two lane pairs from `segments` (in image coordinates,
    /// x = column, y = row) detected on `frame`.
    ///
    /// Internally everything runs in row-major space, where lane lines
    /// descending the image have small slopes and the near-vertical filter
    /// keeps its meaning.
    pub fn extract(&self, segments: &[LineSegment], frame: &Frame) -> Vec<LanePair> {
        let candidates: Vec<Candidate> = segments
            .iter()
            .filter(|s| s.length() >= self.min_segment_length)
            .filter_map(|s| {
                let swapped = s.swapped();
                Line::from_points(swapped.start, swapped.end).map(|line| Candidate {
                    line,
                    midpoint: swapped.midpoint(),
                })
            })
            .collect();

        let mut pairs: Vec<LanePair> = Vec::new();
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                if pairs.len() == 2 {
                    return pairs;
                }
                if self.qualify(&candidates[i], &candidates[j], &pairs, frame) {
                    pairs.push(Self::pair(&candidates[i], &candidates[j]));
                    log::debug!("lane pair {} accepted", pairs.len());
                }
            }
        }
        pairs
    }

    fn qualify(
        &self,
        a: &Candidate,
        b: &Candidate,
        accepted: &[LanePair],
        frame: &Frame,
    ) -> bool {
        if Self::duplicates_accepted_lane(a.line, accepted)
            || Self::duplicates_accepted_lane(b.line, accepted)
        {
            return false;
        }

        if a.line.slope.abs() >= LANE_VERTICAL_SLOPE_THRESHOLD
            || b.line.slope.abs() >= LANE_VERTICAL_SLOPE_THRESHOLD
        {
            return false;
        }

        if (a.line.intercept - b.line.intercept).abs() <= LANE_MIN_INTERCEPT_SEPARATION {
            return false;
        }

        if a.midpoint.distance(b.midpoint) <= self.frame_width / 3.0 {
            return false;
        }

        // Lane boundaries converge toward a vanishing point well outside the
        // visible frame; a nearby crossing means the pair is something else.
        let padding = self.frame_height * 0.5;
        if let Some(crossing) = Line::intersection(a.line, b.line) {
            let inside = crossing.x >= -padding
                && crossing.x <= self.frame_height + padding
                && crossing.y >= -padding
                && crossing.y <= self.frame_width + padding;
            if inside {
                return false;
            }
        }

        self.brightness_qualifies(a, b, frame)
    }

    fn duplicates_accepted_lane(line: Line, accepted: &[LanePair]) -> bool {
        accepted.iter().flat_map(|p| [p.left, p.right]).any(|lane| {
            (lane.slope - line.slope).abs() * 10.0 + (lane.intercept - line.intercept).abs()
                < LANE_DUPLICATE_DISTANCE
        })
    }

    /// A real lane boundary separates surfaces of different brightness, and
    /// the two boundaries of one lane show a similar amount of contrast.
    fn brightness_qualifies(&self, a: &Candidate, b: &Candidate, frame: &Frame) -> bool {
        let (Some(diff_a), Some(diff_b)) = (
            self.brightness_difference(a, frame),
            self.brightness_difference(b, frame),
        ) else {
            return false;
        };

        diff_a.abs() > LANE_BRIGHTNESS_DIFFERENCE_THRESHOLD
            && diff_b.abs() > LANE_BRIGHTNESS_DIFFERENCE_THRESHOLD
            && (diff_a.abs() - diff_b.abs()).abs() < LANE_BRIGHTNESS_MATCH_TOLERANCE
    }

    /// Brightness difference between the two sides of a candidate line,
    /// measured on parallel lines offset perpendicular to it.
    fn brightness_difference(&self, candidate: &Candidate, frame: &Frame) -> Option<f64> {
        let offset =
            (self.frame_width / 40.0) * (candidate.line.slope.powi(2) + 1.0).sqrt();
        let near = self.line_brightness(candidate.line.offset_parallel(offset), candidate, frame)?;
        let far = self.line_brightness(candidate.line.offset_parallel(-offset), candidate, frame)?;
        Some(near - far)
    }

    /// Average luma along `line`, sampled around the candidate segment's
    /// midpoint row. `None` when every sample falls outside the frame.
    fn line_brightness(&self, line: Line, candidate: &Candidate, frame: &Frame) -> Option<f64> {
        let center_row = candidate.midpoint.x.round() as i64;
        let mut sum = 0.0;
        let mut samples = 0usize;
        for row in (center_row - BRIGHTNESS_SAMPLE_RANGE)..(center_row + BRIGHTNESS_SAMPLE_RANGE) {
            let col = line.y_at(row as f64).round() as i64;
            if let Some(luma) = frame.luma_at(row, col) {
                sum += luma;
                samples += 1;
            }
        }
        (samples > 0).then(|| sum / samples as f64)
    }

    fn pair(a: &Candidate, b: &Candidate) -> LanePair {
        // In row-major space the ordinate is the image column: the leftmost
        // midpoint names the left boundary.
        let (left, right) = if a.midpoint.y <= b.midpoint.y {
            (a.line, b.line)
        } else {
            (b.line, a.line)
        };
        LanePair {
            left,
            right,
            bisector: Line::angle_bisector(left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WIDTH: u32 = 120;
    const HEIGHT: u32 = 90;

    /// A dark scene with a bright road surface between two lane boundaries:
    /// column = 0.2 * row + 20 on the left, column = -0.2 * row + 100 on the
    /// right.
    fn road_frame() -> Frame {
        let mut data = vec![0u8; (WIDTH * HEIGHT) as usize * 3];
        for row in 0..HEIGHT as usize {
            let left = 0.2 * row as f64 + 20.0;
            let right = -0.2 * row as f64 + 100.0;
            for col in 0..WIDTH as usize {
                let level = if (col as f64) > left && (col as f64) < right {
                    200
                } else {
                    10
                };
                let offset = (row * WIDTH as usize + col) * 3;
                data[offset..offset + 3].fill(level);
            }
        }
        Frame::new(data, WIDTH, HEIGHT, 0)
    }

    /// Segment along the left boundary, in image coordinates (x = col).
    fn left_segment() -> LineSegment {
        LineSegment::new(PointF::new(20.0, 0.0), PointF::new(36.0, 80.0))
    }

    fn right_segment() -> LineSegment {
        LineSegment::new(PointF::new(100.0, 0.0), PointF::new(84.0, 80.0))
    }

    #[test]
    fn test_accepts_a_plausible_lane_pair() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        let frame = road_frame();

        let pairs = extractor.extract(&[left_segment(), right_segment()], &frame);

        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert_relative_eq!(pair.left.slope, 0.2, epsilon = 1e-9);
        assert_relative_eq!(pair.left.intercept, 20.0, epsilon = 1e-9);
        assert_relative_eq!(pair.right.slope, -0.2, epsilon = 1e-9);
        assert_relative_eq!(pair.right.intercept, 100.0, epsilon = 1e-9);
        // symmetric boundaries bisect to the road center line
        assert_relative_eq!(pair.bisector.slope, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pair.bisector.intercept, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_left_right_assignment_ignores_input_order() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        let frame = road_frame();

        let pairs = extractor.extract(&[right_segment(), left_segment()], &frame);

        assert_eq!(pairs.len(), 1);
        assert_relative_eq!(pairs[0].left.intercept, 20.0, epsilon = 1e-9);
        assert_relative_eq!(pairs[0].right.intercept, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_near_vertical_pair() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        let frame = road_frame();
        // nearly horizontal in the image: steep in row-major space
        let a = LineSegment::new(PointF::new(10.0, 40.0), PointF::new(110.0, 42.0));
        let b = LineSegment::new(PointF::new(10.0, 60.0), PointF::new(110.0, 62.0));

        assert!(extractor.extract(&[a, b], &frame).is_empty());
    }

    #[test]
    fn test_rejects_pair_with_close_intercepts() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        let frame = road_frame();
        let a = left_segment();
        let b = LineSegment::new(PointF::new(23.0, 0.0), PointF::new(39.0, 80.0));

        assert!(extractor.extract(&[a, b], &frame).is_empty());
    }

    #[test]
    fn test_rejects_short_segments() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        let frame = road_frame();
        let a = LineSegment::new(PointF::new(20.0, 0.0), PointF::new(20.4, 2.0));
        let b = LineSegment::new(PointF::new(100.0, 0.0), PointF::new(99.6, 2.0));

        assert!(extractor.extract(&[a, b], &frame).is_empty());
    }

    #[test]
    fn test_suppresses_duplicate_of_accepted_lane() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        let frame = road_frame();
        // a second segment almost on top of the left boundary
        let near_left = LineSegment::new(PointF::new(21.0, 0.0), PointF::new(37.0, 80.0));

        let pairs = extractor.extract(&[left_segment(), right_segment(), near_left], &frame);

        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_rejects_pair_without_brightness_contrast() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        // flat frame: geometry is fine but no side has contrast
        let flat = Frame::new(vec![128u8; (WIDTH * HEIGHT) as usize * 3], WIDTH, HEIGHT, 0);

        let pairs = extractor.extract(&[left_segment(), right_segment()], &flat);

        assert!(pairs.is_empty());
    }

    #[test]
    fn test_no_segments_no_pairs() {
        let extractor = LaneExtractor::new(WIDTH, HEIGHT);
        assert!(extractor.extract(&[], &road_frame()).is_empty());
    }
}

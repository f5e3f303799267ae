//! Plane geometry for lane extraction: points, segments, and lines in
//! slope/intercept form.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(a: PointF, b: PointF) -> PointF {
        PointF::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    pub fn distance(self, other: PointF) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// The same point with the axes exchanged.
    pub fn swapped(self) -> PointF {
        PointF::new(self.y, self.x)
    }
}

/// A detected line segment, as produced by an external line detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub start: PointF,
    pub end: PointF,
}

impl LineSegment {
    pub fn new(start: PointF, end: PointF) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> PointF {
        PointF::midpoint(self.start, self.end)
    }

    pub fn swapped(&self) -> LineSegment {
        LineSegment::new(self.start.swapped(), self.end.swapped())
    }
}

/// An infinite line `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Line through two points, or `None` when the points share an abscissa
    /// (a vertical line has no slope/intercept form).
    pub fn from_points(a: PointF, b: PointF) -> Option<Line> {
        if a.x == b.x {
            return None;
        }
        let slope = (a.y - b.y) / (a.x - b.x);
        let intercept = a.y - slope * a.x;
        Some(Line::new(slope, intercept))
    }

    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn x_at(&self, y: f64) -> f64 {
        (y - self.intercept) / self.slope
    }

    /// Intersection of two lines, `None` when they are parallel.
    pub fn intersection(a: Line, b: Line) -> Option<PointF> {
        if a.slope == b.slope {
            return None;
        }
        let x = (a.intercept - b.intercept) / (b.slope - a.slope);
        Some(PointF::new(x, a.y_at(x)))
    }

    /// Perpendicular distance from `p` to the line, signed by which side of
    /// the line the point lies on.
    pub fn signed_distance_to(&self, p: PointF) -> f64 {
        (-self.slope * p.x + p.y - self.intercept) / (self.slope.powi(2) + 1.0).sqrt()
    }

    /// Bisector of the angle between two lines, from their normalized
    /// general forms.
    pub fn angle_bisector(a: Line, b: Line) -> Line {
        let r1 = (a.slope.powi(2) + 1.0).sqrt();
        let r2 = (b.slope.powi(2) + 1.0).sqrt();
        let big_a = -a.slope / r1 + -b.slope / r2;
        let big_b = 1.0 / r1 + 1.0 / r2;
        let big_c = -a.intercept / r1 + -b.intercept / r2;
        Line::new(-big_a / big_b, -big_c / big_b)
    }

    /// The parallel line shifted by `delta` along the ordinate axis.
    pub fn offset_parallel(&self, delta: f64) -> Line {
        Line::new(self.slope, self.intercept + delta)
    }
}

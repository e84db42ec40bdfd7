#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle. Width and height may be negative; canvas path
/// semantics treat a negative extent as a flipped rect, so callers pass
/// these values through unchanged.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RectSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectSpec {
    /// The same rectangle with non-negative extents.
    pub fn normalized(self) -> RectSpec {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        RectSpec {
            x,
            y,
            width,
            height,
        }
    }
}

/// Rectangle whose opposite corners are the stroke start and the current
/// pointer position. Anchored at the current point, extending back toward
/// the start, so dragging in any direction works.
pub fn rect_between(start: Point, current: Point) -> RectSpec {
    RectSpec {
        x: current.x,
        y: current.y,
        width: start.x - current.x,
        height: start.y - current.y,
    }
}

/// Radius of the circle tool: Euclidean distance from the stroke start to
/// the current pointer position.
pub fn circle_radius(start: Point, current: Point) -> f64 {
    (start.x - current.x).hypot(start.y - current.y)
}

/// Destination rectangle that fits a `src`-sized bitmap into a `dst`-sized
/// surface: scaled to fit, aspect ratio preserved, centered. `None` when
/// either side is degenerate.
pub fn fit_rect(
    src_width: f64,
    src_height: f64,
    dst_width: f64,
    dst_height: f64,
) -> Option<RectSpec> {
    if src_width <= 0.0 || src_height <= 0.0 || dst_width <= 0.0 || dst_height <= 0.0 {
        return None;
    }
    let scale = (dst_width / src_width).min(dst_height / src_height);
    let width = (src_width * scale).round();
    let height = (src_height * scale).round();
    Some(RectSpec {
        x: ((dst_width - width) / 2.0).round(),
        y: ((dst_height - height) / 2.0).round(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_spans_start_and_current_corners() {
        let rect = rect_between(Point { x: 10.0, y: 10.0 }, Point { x: 50.0, y: 40.0 });
        let normalized = rect.normalized();
        assert_eq!(normalized.x, 10.0);
        assert_eq!(normalized.y, 10.0);
        assert_eq!(normalized.width, 40.0);
        assert_eq!(normalized.height, 30.0);
    }

    #[test]
    fn rect_allows_negative_extents_when_dragging_past_start() {
        let rect = rect_between(Point { x: 50.0, y: 40.0 }, Point { x: 10.0, y: 10.0 });
        assert_eq!(rect.width, 40.0);
        assert_eq!(rect.height, 30.0);
        assert_eq!(rect.normalized(), rect);

        let flipped = rect_between(Point { x: 10.0, y: 10.0 }, Point { x: 50.0, y: 40.0 });
        assert!(flipped.width < 0.0 && flipped.height < 0.0);
        assert_eq!(flipped.normalized(), rect);
    }

    #[test]
    fn circle_radius_is_euclidean_distance() {
        let radius = circle_radius(Point { x: 0.0, y: 0.0 }, Point { x: 3.0, y: 4.0 });
        assert_eq!(radius, 5.0);
    }

    #[test]
    fn fit_rect_preserves_aspect_and_centers() {
        // 200x100 into 100x100: scaled to 100x50, centered vertically.
        let fit = fit_rect(200.0, 100.0, 100.0, 100.0).expect("fit");
        assert_eq!(fit.width, 100.0);
        assert_eq!(fit.height, 50.0);
        assert_eq!(fit.x, 0.0);
        assert_eq!(fit.y, 25.0);
    }

    #[test]
    fn fit_rect_scales_up_small_sources() {
        let fit = fit_rect(50.0, 50.0, 200.0, 100.0).expect("fit");
        assert_eq!(fit.width, 100.0);
        assert_eq!(fit.height, 100.0);
        assert_eq!(fit.x, 50.0);
        assert_eq!(fit.y, 0.0);
    }

    #[test]
    fn fit_rect_rejects_degenerate_dimensions() {
        assert!(fit_rect(0.0, 100.0, 100.0, 100.0).is_none());
        assert!(fit_rect(100.0, 100.0, 100.0, 0.0).is_none());
    }
}

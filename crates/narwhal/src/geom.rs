pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn size(w: f64, h: f64) -> Size {
    euclid::size2(w, h)
}

/// Axis-aligned box around `center`.
pub fn rect_around(center: Point, size: Size) -> Rect {
    Rect::new(point(center.x - size.width / 2.0, center.y - size.height / 2.0), size)
}

/// Where the segment from the center of a `size` box at `center` towards `toward` leaves the
/// box.
pub fn intersect_rect(center: Point, size: Size, toward: Point) -> Point {
    let dx = toward.x - center.x;
    let dy = toward.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return center;
    }
    let (w, h) = (size.width / 2.0, size.height / 2.0);
    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        let h = if dy < 0.0 { -h } else { h };
        (h * dx / dy, h)
    } else {
        let w = if dx < 0.0 { -w } else { w };
        (w, w * dy / dx)
    };
    point(center.x + sx, center.y + sy)
}

/// Chaikin corner cutting. The first and last points are kept in place.
pub fn chaikin(points: &[Point], iterations: usize) -> Vec<Point> {
    let mut pts = points.to_vec();
    for _ in 0..iterations {
        if pts.len() < 3 {
            break;
        }
        let (Some(&first), Some(&last)) = (pts.first(), pts.last()) else {
            break;
        };
        let mut next = Vec::with_capacity(pts.len() * 2);
        next.push(first);
        for pair in pts.windows(2) {
            next.push(pair[0].lerp(pair[1], 0.25));
            next.push(pair[0].lerp(pair[1], 0.75));
        }
        next.push(last);
        pts = next;
    }
    pts
}

//! Search for a ruler-like rectangle in an image.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

/// Smaller quadrilaterals are treated as noise.
pub const MIN_RULER_AREA_PX: f64 = 10_000.0;

const BLUR_SIGMA: f32 = 1.1;
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
/// Polygon approximation tolerance as a fraction of the perimeter.
const APPROX_EPSILON_RATIO: f64 = 0.02;

/// Quadrilateral contour that may be a ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerCandidate {
    pub corners: Vec<Point<i32>>,
    pub area_px: f64,
}

/// Largest external contour that approximates to four vertices and covers
/// at least [`MIN_RULER_AREA_PX`].
pub fn find_ruler(gray: &GrayImage) -> Option<RulerCandidate> {
    let blurred = imageproc::filter::gaussian_blur_f32(gray, BLUR_SIGMA);
    let edges = imageproc::edges::canny(&blurred, CANNY_LOW, CANNY_HIGH);

    let mut outer: Vec<(f64, Vec<Point<i32>>)> = find_contours::<i32>(&edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter(|c| c.points.len() >= 4)
        .map(|c| (polygon_area(&c.points), c.points))
        .collect();
    outer.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (area, points) in outer {
        let perimeter = arc_length(&points, true);
        if perimeter <= 0.0 {
            continue;
        }
        let approx = approximate_polygon_dp(&points, APPROX_EPSILON_RATIO * perimeter, true);
        if approx.len() == 4 && area > MIN_RULER_AREA_PX {
            return Some(RulerCandidate {
                corners: approx,
                area_px: area,
            });
        }
    }
    None
}

/// Shoelace area of a closed polygon.
fn polygon_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: i64 = (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y)
        })
        .sum();
    twice.unsigned_abs() as f64 / 2.0
}

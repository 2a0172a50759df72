//! Perspective correction for photographed receipts
//!
//! Finds the largest four-sided outline in a downscaled edge map and warps
//! the full-resolution image so that outline becomes an upright rectangle.
//! Any failure leaves the image untouched.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::morphology::close;
use imageproc::point::Point;

const DETECT_MAX_SIDE: u32 = 900;
const CANNY_LOW: f32 = 40.0;
const CANNY_HIGH: f32 = 140.0;
const CANDIDATE_CONTOURS: usize = 6;
const APPROX_EPSILON: f64 = 0.02;
/// Warped results smaller than this on either side are discarded
const MIN_WARPED_SIDE: u32 = 400;

/// Corner order used for the warp
type Quad = [(f32, f32); 4];

/// Warp the receipt outline to a flat rectangle, or `None` when no usable
/// outline is found
pub fn try_rectify(img: &DynamicImage) -> Option<DynamicImage> {
    let (w, h) = img.dimensions();
    let longest = w.max(h);
    if longest == 0 {
        return None;
    }

    let scale = if longest > DETECT_MAX_SIDE {
        DETECT_MAX_SIDE as f32 / longest as f32
    } else {
        1.0
    };

    let mut gray = img.to_luma8();
    if scale < 1.0 {
        let sw = ((w as f32 * scale) as u32).max(1);
        let sh = ((h as f32 * scale) as u32).max(1);
        gray = imageops::resize(&gray, sw, sh, FilterType::Triangle);
    }
    let gray = imageops::blur(&gray, 1.1);

    let edges = canny(&gray, CANNY_LOW, CANNY_HIGH);
    let edges = close(&close(&edges, Norm::LInf, 2), Norm::LInf, 2);

    let quad = find_quad(&edges)?;
    let quad = order_points(quad.map(|(x, y)| (x / scale, y / scale)));

    let warped = four_point_transform(&img.to_rgb8(), &quad)?;
    if warped.width().min(warped.height()) < MIN_WARPED_SIDE {
        tracing::debug!(
            width = warped.width(),
            height = warped.height(),
            "Rectified receipt too small, keeping original"
        );
        return None;
    }
    Some(DynamicImage::ImageRgb8(warped))
}

/// First four-point approximation among the largest outer contours
fn find_quad(edges: &image::GrayImage) -> Option<Quad> {
    let mut outer: Vec<Vec<Point<i32>>> = find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .collect();
    outer.sort_by(|a, b| polygon_area(b).total_cmp(&polygon_area(a)));

    outer.iter().take(CANDIDATE_CONTOURS).find_map(|points| {
        let perimeter = arc_length(points, true);
        let approx = approximate_polygon_dp(points, APPROX_EPSILON * perimeter, true);
        match approx.as_slice() {
            [a, b, c, d] => Some([a, b, c, d].map(|p| (p.x as f32, p.y as f32))),
            _ => None,
        }
    })
}

fn polygon_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: i64 = (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
        })
        .sum();
    twice.abs() as f64 / 2.0
}

/// Top-left, top-right, bottom-right, bottom-left
fn order_points(pts: Quad) -> Quad {
    let pick = |key: fn(&(f32, f32)) -> f32, max: bool| {
        let mut best = pts[0];
        for p in &pts[1..] {
            let better = if max {
                key(p) > key(&best)
            } else {
                key(p) < key(&best)
            };
            if better {
                best = *p;
            }
        }
        best
    };

    let sum = |p: &(f32, f32)| p.0 + p.1;
    let diff = |p: &(f32, f32)| p.1 - p.0;
    [pick(sum, false), pick(diff, false), pick(sum, true), pick(diff, true)]
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn four_point_transform(img: &RgbImage, quad: &Quad) -> Option<RgbImage> {
    let [tl, tr, br, bl] = *quad;
    let max_w = distance(br, bl).max(distance(tr, tl)) as u32;
    let max_h = distance(tr, br).max(distance(tl, bl)) as u32;
    if max_w == 0 || max_h == 0 {
        return None;
    }

    let (right, bottom) = ((max_w - 1) as f32, (max_h - 1) as f32);
    let target = [(0.0, 0.0), (right, 0.0), (right, bottom), (0.0, bottom)];
    let projection = Projection::from_control_points(*quad, target)?;

    let mut out = RgbImage::new(max_w, max_h);
    warp_into(
        img,
        &projection,
        Interpolation::Bicubic,
        Rgb([255, 255, 255]),
        &mut out,
    );
    Some(out)
}

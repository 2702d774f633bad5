use geo_types::{Coord, LineString, Polygon};
use image::{GrayImage, RgbImage, RgbaImage};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Three-channel source image handed to the segmenter.
pub type RawImage = RgbImage;

/// Single-channel mask where every pixel is either 0 (background) or 255 (foreground).
pub type BinaryMask = GrayImage;

/// Axis-aligned rectangle in source image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box containing every point. `None` for an empty slice.
    pub fn from_points(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }
}

/// One connected foreground component, described by its outer boundary.
#[derive(Debug, Clone)]
pub struct Region {
    /// Boundary pixels in tracing order
    pub boundary: Vec<Point<i32>>,
    /// Enclosed area of the boundary polygon
    pub area: f64,
    pub bounding_box: BoundingBox,
}

impl Region {
    /// Build a region from a traced boundary. Returns `None` for an empty boundary.
    pub fn from_boundary(boundary: Vec<Point<i32>>) -> Option<Self> {
        let bounding_box = BoundingBox::from_points(&boundary)?;
        let area = boundary_area(&boundary);
        Some(Self {
            boundary,
            area,
            bounding_box,
        })
    }

    /// Boundary points translated so the bounding box origin sits at (0, 0).
    pub fn local_boundary(&self) -> Vec<Point<i32>> {
        let (ox, oy) = (self.bounding_box.x as i32, self.bounding_box.y as i32);
        self.boundary
            .iter()
            .map(|p| Point::new(p.x - ox, p.y - oy))
            .collect()
    }
}

fn boundary_area(boundary: &[Point<i32>]) -> f64 {
    use geo::Area;

    if boundary.len() < 3 {
        return 0.0;
    }
    let coords: Vec<Coord<f64>> = boundary
        .iter()
        .map(|p| Coord {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();
    Polygon::new(LineString::new(coords), vec![]).unsigned_area()
}

/// A cut-out subject: the cropped pixels of one region with a hard-edged alpha channel.
#[derive(Debug, Clone)]
pub struct Subject {
    /// Batch-wide (or per-image) serial number, starting at 1
    pub serial: u32,
    pub image: RgbaImage,
    /// Where the crop came from in the source image
    pub bounding_box: BoundingBox,
    pub area: f64,
}

impl Subject {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of fully opaque pixels.
    pub fn opaque_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p[3] == 255).count()
    }
}

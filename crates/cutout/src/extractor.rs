use std::vec::IntoIter;

use crate::{
    algorithms::{compose_rgba, region_alpha, ExternalContourExtractor},
    error::{CutoutError, Result},
    numbering::Numbering,
    traits::ContourExtractor,
    types::{BinaryMask, RawImage, Region, Subject},
};

/// Finds regions in a mask and cuts them out of the source image.
pub struct Extractor {
    contour_extractor: Box<dyn ContourExtractor>,
    min_area: f64,
}

impl Extractor {
    pub fn new(min_area: f64) -> Self {
        Self::with_contour_extractor(ExternalContourExtractor, min_area)
    }

    pub fn with_contour_extractor<C>(contour_extractor: C, min_area: f64) -> Self
    where
        C: ContourExtractor + 'static,
    {
        Self {
            contour_extractor: Box::new(contour_extractor),
            min_area,
        }
    }

    /// Lazily yield a [`Subject`] for every region whose area reaches `min_area`.
    ///
    /// Serials are drawn from `numbering` only as subjects are yielded, so an
    /// iterator dropped halfway leaves a shared counter without gaps.
    pub fn extract<'a>(
        &self,
        image: &'a RawImage,
        mask: &BinaryMask,
        numbering: Numbering<'a>,
    ) -> Result<Subjects<'a>> {
        if image.dimensions() != mask.dimensions() {
            return Err(CutoutError::DimensionMismatch {
                image_width: image.width(),
                image_height: image.height(),
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }

        let regions = self.contour_extractor.extract_regions(mask)?;
        Ok(Subjects {
            image,
            regions: regions.into_iter(),
            min_area: self.min_area,
            numbering,
        })
    }
}

/// One-pass iterator over the subjects of a single image
pub struct Subjects<'a> {
    image: &'a RawImage,
    regions: IntoIter<Region>,
    min_area: f64,
    numbering: Numbering<'a>,
}

impl Iterator for Subjects<'_> {
    type Item = Subject;

    fn next(&mut self) -> Option<Subject> {
        let min_area = self.min_area;
        let region = self.regions.find(|r| r.area >= min_area)?;

        let alpha = region_alpha(&region);
        let image = compose_rgba(self.image, &region, &alpha);

        Some(Subject {
            serial: self.numbering.next_serial(),
            image,
            bounding_box: region.bounding_box,
            area: region.area,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.regions.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{numbering::SerialCounter, pipeline::Segmenter};
    use image::{GrayImage, Luma, Rgb};

    fn scene(squares: &[(u32, u32, u32)]) -> RawImage {
        RawImage::from_fn(200, 200, |x, y| {
            let inside = squares.iter().any(|&(x0, y0, side)| {
                (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y)
            });
            if inside {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    fn run(image: &RawImage, min_area: f64) -> Vec<Subject> {
        let mask = Segmenter::default().segment(image).unwrap();
        Extractor::new(min_area)
            .extract(image, &mask, Numbering::per_image())
            .unwrap()
            .collect()
    }

    #[test]
    fn uniform_image_yields_nothing() {
        let image = RawImage::from_pixel(200, 200, Rgb([200, 200, 200]));
        assert!(run(&image, 1000.0).is_empty());
    }

    #[test]
    fn centred_square_yields_one_opaque_subject() {
        let image = scene(&[(50, 50, 100)]);
        let subjects = run(&image, 1000.0);

        assert_eq!(subjects.len(), 1);
        let subject = &subjects[0];
        assert_eq!(subject.serial, 1);
        assert!(subject.width().abs_diff(100) <= 4, "width {}", subject.width());
        assert!(subject.height().abs_diff(100) <= 4, "height {}", subject.height());
        assert_eq!(subject.width(), subject.bounding_box.width);
        assert_eq!(subject.height(), subject.bounding_box.height);

        // The square's own pixels are fully opaque
        let bbox = subject.bounding_box;
        for y in 50..150 {
            for x in 50..150 {
                if x >= bbox.x && y >= bbox.y && x < bbox.x + bbox.width && y < bbox.y + bbox.height {
                    assert_eq!(subject.image.get_pixel(x - bbox.x, y - bbox.y)[3], 255);
                }
            }
        }
    }

    #[test]
    fn min_area_above_region_size_yields_nothing() {
        let image = scene(&[(50, 50, 100)]);
        assert!(run(&image, 50_000.0).is_empty());
    }

    #[test]
    fn raising_min_area_never_adds_subjects() {
        let image = scene(&[(10, 10, 20), (60, 60, 40), (120, 20, 60)]);
        let mut previous = usize::MAX;
        for min_area in [0.0, 100.0, 500.0, 1500.0, 3000.0, 10_000.0] {
            let count = run(&image, min_area).len();
            assert!(count <= previous, "{count} > {previous} at {min_area}");
            previous = count;
        }
        assert_eq!(run(&image, 100.0).len(), 3);
    }

    #[test]
    fn alpha_is_binary_and_transparent_outside_shape() {
        let mut mask = GrayImage::new(60, 60);
        // Solid triangle
        for y in 10..50u32 {
            for x in 10..(60 - y) {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        let image = RawImage::from_pixel(60, 60, Rgb([9, 8, 7]));
        let subjects: Vec<_> = Extractor::new(10.0)
            .extract(&image, &mask, Numbering::per_image())
            .unwrap()
            .collect();

        assert_eq!(subjects.len(), 1);
        let alpha: Vec<u8> = subjects[0].image.pixels().map(|p| p[3]).collect();
        assert!(alpha.iter().all(|&a| a == 0 || a == 255));
        assert!(alpha.contains(&0));
        assert!(alpha.contains(&255));
    }

    #[test]
    fn shared_counter_continues_across_images() {
        let first = scene(&[(20, 20, 40), (120, 120, 40)]);
        let second = scene(&[(70, 70, 50)]);
        let segmenter = Segmenter::default();
        let extractor = Extractor::new(500.0);
        let mut counter = SerialCounter::new();

        let mut serials = Vec::new();
        for image in [&first, &second] {
            let mask = segmenter.segment(image).unwrap();
            serials.extend(
                extractor
                    .extract(image, &mask, Numbering::from(&mut counter))
                    .unwrap()
                    .map(|s| s.serial),
            );
        }

        assert_eq!(serials, vec![1, 2, 3]);
        assert_eq!(counter.issued(), 3);
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let image = RawImage::new(10, 10);
        let mask = GrayImage::new(10, 11);
        assert!(matches!(
            Extractor::new(0.0).extract(&image, &mask, Numbering::per_image()),
            Err(CutoutError::DimensionMismatch { .. })
        ));
    }
}

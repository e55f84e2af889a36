use image::{GrayImage, Luma};
use imageproc::contours::BorderType;
use crate::{error::Result, traits::ContourExtractor, types::RawContour};

/// Copy of the mask inside a one pixel background frame.
///
/// `find_contours` reports a region touching the image edge as a hole with no
/// parent; framing it keeps every region's border an outer one.
fn framed(mask: &GrayImage) -> GrayImage {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] > 0 {
            padded.put_pixel(x + 1, y + 1, Luma([255]));
        }
    }
    padded
}

/// Imageproc-based contour extractor keeping only top-level outer borders.
///
/// Hole borders and regions nested inside holes are dropped. Regions touching
/// the image edge are traced like any other.
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    fn extract_contours(&self, mask: &GrayImage) -> Result<Vec<RawContour>> {
        let contours = imageproc::contours::find_contours::<i32>(&framed(mask));

        let result = contours
            .into_iter()
            .filter(|contour| {
                matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none()
            })
            .filter(|contour| contour.points.len() >= 3)
            .map(|contour| {
                RawContour::new(
                    contour.points
                        .iter()
                        .map(|p| [f64::from(p.x - 1), f64::from(p.y - 1)])
                        .collect(),
                )
            })
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, value: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = GrayImage::new(16, 16);
        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn hole_and_island_are_ignored() {
        let mut mask = GrayImage::new(60, 60);
        fill(&mut mask, 5, 5, 55, 55, 255);
        fill(&mut mask, 15, 15, 45, 45, 0);
        // island inside the hole
        fill(&mut mask, 25, 25, 35, 35, 255);

        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert_eq!(contours.len(), 1);
        assert!((contours[0].area() - 49.0 * 49.0).abs() < 1e-9);
    }

    #[test]
    fn region_flush_with_left_edge_is_traced() {
        let mut mask = GrayImage::new(40, 40);
        fill(&mut mask, 0, 10, 20, 30, 255);

        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert_eq!(contours.len(), 1);
        assert!((contours[0].area() - 19.0 * 19.0).abs() < 1e-9);
        let min_x = contours[0].points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        assert_eq!(min_x, 0.0);
    }

    #[test]
    fn fully_set_mask_is_one_region() {
        let mut mask = GrayImage::new(50, 50);
        fill(&mut mask, 0, 0, 50, 50, 255);

        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert_eq!(contours.len(), 1);
        assert!((contours[0].area() - 49.0 * 49.0).abs() < 1e-9);
        for point in &contours[0].points {
            assert!((0.0..=49.0).contains(&point[0]) && (0.0..=49.0).contains(&point[1]));
        }
    }

    #[test]
    fn separate_regions_each_yield_a_contour() {
        let mut mask = GrayImage::new(60, 30);
        fill(&mut mask, 2, 2, 20, 20, 255);
        fill(&mut mask, 30, 5, 55, 25, 255);

        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert_eq!(contours.len(), 2);
    }
}

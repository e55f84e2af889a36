use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use roof::{
    algorithms::{extract_polygons, AreaScorer, DouglasPeuckerSimplifier, ImageprocContourExtractor},
    measurement::{EARTH_RADIUS_M, SQFT_PER_SQM},
    projector::project_polygon,
    Calibration, Detector, GeoBoundingBox, LatLng, ManualEditor, Pitch, Projection,
    ProjectionKind, RoofProject, SectionSource,
};

/// 100x100 capture: background 35, roof block 120 at 30..70, shadow strip 30 below it
fn single_roof_capture() -> DynamicImage {
    let mut img = RgbImage::from_pixel(100, 100, Rgb([35, 35, 35]));
    for y in 30..70 {
        for x in 30..70 {
            img.put_pixel(x, y, Rgb([120, 120, 120]));
        }
    }
    for y in 70..100 {
        for x in 30..70 {
            img.put_pixel(x, y, Rgb([30, 30, 30]));
        }
    }
    DynamicImage::ImageRgb8(img)
}

fn saskatoon() -> GeoBoundingBox {
    GeoBoundingBox::new(LatLng::new(52.14, -106.66), LatLng::new(52.13, -106.68))
}

#[test]
fn single_roof_with_dark_shadow_is_steep() {
    let detection = Detector::default()
        .detect(&single_roof_capture(), saskatoon())
        .expect("Should detect successfully");

    assert_eq!(detection.sections.len(), 1);
    let section = &detection.sections[0].section;
    assert_eq!(section.pitch, Pitch::Steep);
    assert_eq!(section.pitch.label(), "6/12");
    assert_eq!(section.source, SectionSource::Detected);
    assert!(section.area_sqft > 0);
    assert!(section.vertices.len() >= 3);

    let bounds = saskatoon();
    for vertex in &section.vertices {
        assert!(vertex.lat >= bounds.south_west.lat && vertex.lat <= bounds.north_east.lat);
        assert!(vertex.lng >= bounds.south_west.lng && vertex.lng <= bounds.north_east.lng);
    }
}

#[test]
fn roof_touching_viewport_edge_is_detected() {
    // Roof cut off by the left edge, on vegetation the color cue ignores
    let mut img = RgbImage::from_pixel(100, 100, Rgb([40, 120, 40]));
    for y in 30..70 {
        for x in 0..40 {
            img.put_pixel(x, y, Rgb([120, 120, 120]));
        }
    }
    let bounds = saskatoon();

    let detection = Detector::default()
        .detect(&DynamicImage::ImageRgb8(img), bounds)
        .unwrap();

    assert_eq!(detection.sections.len(), 1);
    let section = &detection.sections[0].section;
    assert!(section.area_sqft > 0);
    let west = section.vertices.iter().map(|v| v.lng).fold(f64::INFINITY, f64::min);
    assert!((west - bounds.south_west.lng).abs() < 1e-9);
}

#[test]
fn detection_is_deterministic() {
    let detector = Detector::default();
    let capture = single_roof_capture();
    let first = detector.detect(&capture, saskatoon()).unwrap();
    let second = detector.detect(&capture, saskatoon()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn total_is_sum_of_rounded_section_areas() {
    let detection = Detector::default().detect(&single_roof_capture(), saskatoon()).unwrap();
    let summed: u64 = detection.sections.iter().map(|d| d.section.area_sqft).sum();
    assert_eq!(detection.total_area_sqft(), summed);

    let mut project = RoofProject::new("1 Test Ave");
    project.replace_with(detection);
    assert_eq!(project.report().total_area, summed);
}

#[test]
fn half_degree_square_at_equator_matches_analytic_area() {
    let bounds = GeoBoundingBox::new(LatLng::new(0.5, 0.5), LatLng::new(-0.5, -0.5));
    let calibration = Calibration::new(100, 100, bounds).unwrap();

    // Filled 25..=75 so the traced border runs exactly from pixel 25 to 75
    let mut mask = GrayImage::new(100, 100);
    for y in 25..=75 {
        for x in 25..=75 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }

    let polygons = extract_polygons(
        &mask,
        &ImageprocContourExtractor,
        &DouglasPeuckerSimplifier::default(),
        100.0,
    )
    .unwrap();
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].len(), 4);

    let ring = project_polygon(&calibration, &polygons[0]).unwrap();
    let measured = roof::measure(&ring) as f64;

    let d_lng = 0.5_f64.to_radians();
    let analytic_m2 = EARTH_RADIUS_M * EARTH_RADIUS_M * d_lng
        * (0.25_f64.to_radians().sin() - (-0.25_f64).to_radians().sin());
    let analytic = analytic_m2 * SQFT_PER_SQM;

    assert!(((measured - analytic) / analytic).abs() < 0.005, "measured {measured}, analytic {analytic}");
}

#[test]
fn scorer_filters_small_candidates() {
    let detector = Detector::builder()
        .with_scorer(AreaScorer { reference_area: 10_000.0 }, 0.5)
        .build()
        .unwrap();
    let detection = detector.detect(&single_roof_capture(), saskatoon()).unwrap();
    assert!(detection.sections.is_empty());
    assert_eq!(detection.diagnostic(), Some("no sections found"));
}

#[test]
fn web_mercator_agrees_with_equirectangular_on_small_captures() {
    let capture = single_roof_capture();
    let linear = Detector::default().detect(&capture, saskatoon()).unwrap();
    let mercator = Detector::builder()
        .with_projection(ProjectionKind::WebMercator)
        .build()
        .unwrap()
        .detect(&capture, saskatoon())
        .unwrap();

    assert_eq!(linear.sections.len(), mercator.sections.len());
    let a = linear.total_area_sqft() as f64;
    let b = mercator.total_area_sqft() as f64;
    assert!((a - b).abs() / a < 0.01);
}

/// Equirectangular mapping shifted east by a fixed longitude
#[derive(Debug)]
struct ShiftedEast(f64);

impl Projection for ShiftedEast {
    fn unproject(&self, u: f64, v: f64, bounds: &GeoBoundingBox) -> LatLng {
        let point = ProjectionKind::Equirectangular.unproject(u, v, bounds);
        LatLng::new(point.lat, point.lng + self.0)
    }

    fn project(&self, point: LatLng, bounds: &GeoBoundingBox) -> (f64, f64) {
        ProjectionKind::Equirectangular.project(LatLng::new(point.lat, point.lng - self.0), bounds)
    }
}

#[test]
fn detector_accepts_custom_projection() {
    let capture = single_roof_capture();
    let linear = Detector::default().detect(&capture, saskatoon()).unwrap();
    let detector = Detector::builder().with_projection(ShiftedEast(0.001)).build().unwrap();
    assert!(detector.info().contains("custom"));
    let shifted = detector.detect(&capture, saskatoon()).unwrap();

    assert_eq!(linear.sections.len(), shifted.sections.len());
    let a = &linear.sections[0].section;
    let b = &shifted.sections[0].section;
    assert_eq!(a.vertices.len(), b.vertices.len());
    for (p, q) in a.vertices.iter().zip(&b.vertices) {
        assert_eq!(p.lat, q.lat);
        assert!((q.lng - p.lng - 0.001).abs() < 1e-9);
    }
    assert_eq!(a.pitch, b.pitch);
}

#[test]
fn manual_editor_needs_three_points() {
    let mut editor = ManualEditor::new();
    editor.add_point(LatLng::new(52.1330, -106.6700));
    editor.add_point(LatLng::new(52.1330, -106.6697));
    assert!(editor.finalize().is_none());
    assert_eq!(editor.points().len(), 2);

    editor.add_point(LatLng::new(52.1332, -106.6697));
    let section = editor.finalize().expect("three points make a section");
    assert_eq!(section.pitch, Pitch::ManualDefault);
    assert_eq!(section.source, SectionSource::Manual);
    assert!(section.area_sqft > 0);
    assert!(editor.points().is_empty());
}

#[test]
fn project_survives_geojson_file_round_trip() {
    let detection = Detector::default().detect(&single_roof_capture(), saskatoon()).unwrap();
    let mut project = RoofProject::new("221 Spadina Cres");
    project.replace_with(detection);

    let path = std::env::temp_dir().join("roof_round_trip_test.geojson");
    let path = path.to_string_lossy().to_string();
    project.save_geojson(&path).unwrap();
    let restored = RoofProject::from_geojson_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(restored.address, project.address);
    assert_eq!(restored.total_area_sqft(), project.total_area_sqft());
    assert_eq!(restored.sections()[0].pitch, Pitch::Steep);
}

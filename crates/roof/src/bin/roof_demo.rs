use roof::{
    algorithms::AreaScorer,
    Detector, GeoBoundingBox, LatLng, ProjectionKind, RoofCommand, RoofSession,
};
use image::{DynamicImage, Rgb, RgbImage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏠 Roof Footprint Extraction Demo");
    println!("=================================");

    let capture = create_test_capture();
    let bounds = GeoBoundingBox::new(
        LatLng::new(52.1340, -106.6690),
        LatLng::new(52.1330, -106.6710),
    );

    demo_commands();
    demo_detection(&capture, bounds)?;
    demo_session(capture, bounds)?;

    println!("✅ All demos completed successfully!");
    println!("📁 Generated files: demo_roof.geojson");

    Ok(())
}

fn demo_commands() {
    println!("\n🔧 Demo: RoofCommand with schemars & strum");
    println!("------------------------------------------");

    println!("📋 Available commands:");
    for (i, name) in RoofCommand::command_names().iter().enumerate() {
        println!("   {}. {}", i + 1, name);
    }

    let commands = vec![
        RoofCommand::Detect,
        RoofCommand::AddPoint { lat: 52.1335, lng: -106.6700 },
        RoofCommand::SetPitch { index: 0, label: "8/12".to_string() },
    ];

    println!("\n📝 Command details:");
    for cmd in commands {
        println!("   🔹 {}", cmd);
        println!("     Description: {}", cmd.description());
        match serde_json::to_string(&cmd) {
            Ok(json) => println!("     JSON: {}", json),
            Err(e) => println!("     JSON error: {}", e),
        }
    }
}

fn demo_detection(capture: &DynamicImage, bounds: GeoBoundingBox) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n🔬 Demo 1: Default vs Customised Detectors");
    println!("------------------------------------------");

    let detection = Detector::default().detect(capture, bounds)?;
    println!("   🔹 Default pipeline: {} sections, {} sqft total",
             detection.sections.len(), detection.total_area_sqft());
    for detected in &detection.sections {
        println!("      {} vertices, {} sqft, pitch {}",
                 detected.outline.len(), detected.section.area_sqft, detected.section.pitch);
    }

    let strict = Detector::builder()
        .with_scorer(AreaScorer { reference_area: 20_000.0 }, 0.5)
        .with_projection(ProjectionKind::WebMercator)
        .build()?;
    println!("   🔸 {}", strict.info());

    let filtered = strict.detect(capture, bounds)?;
    match filtered.diagnostic() {
        Some(reason) => println!("   🔸 Scored pipeline: {}", reason),
        None => println!("   🔸 Scored pipeline: {} sections", filtered.sections.len()),
    }

    Ok(())
}

fn demo_session(capture: DynamicImage, bounds: GeoBoundingBox) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n🎨 Demo 2: Session with detection and hand-drawn sections");
    println!("---------------------------------------------------------");

    let mut session = RoofSession::new();
    session.set_image(capture);
    session.set_bounds(bounds)?;

    let output = session.execute(RoofCommand::Detect)?;
    if let Some(message) = &output.message {
        println!("   📊 {}", message);
    }

    for (lat, lng) in [(52.13302, -106.67090), (52.13302, -106.67080), (52.13308, -106.67080)] {
        session.execute(RoofCommand::AddPoint { lat, lng })?;
    }
    let output = session.execute(RoofCommand::FinishSection)?;
    if let Some(message) = &output.message {
        println!("   ✏️  {}", message);
    }

    session.execute(RoofCommand::SetAddress { address: "221 Demo Cres".to_string() })?;
    let report = session.export_report()?;
    println!("   📋 Report:\n{}", serde_json::to_string_pretty(&report)?);

    session.project().save_geojson("demo_roof.geojson")?;
    Ok(())
}

/// Two light roofs with darker strips below, on a dark lot
fn create_test_capture() -> DynamicImage {
    let mut img = RgbImage::from_pixel(200, 120, Rgb([35, 38, 35]));
    for (x0, y0, w, h) in [(20u32, 20u32, 60u32, 40u32), (110, 30, 50, 50)] {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Rgb([125, 120, 118]));
            }
        }
        for y in y0 + h..(y0 + h + 20).min(120) {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Rgb([30, 30, 32]));
            }
        }
    }
    DynamicImage::ImageRgb8(img)
}

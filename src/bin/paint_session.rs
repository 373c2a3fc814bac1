//! Headless painting session: paints a stroke into a mask over a vortex field
//! and renders a few frames through the recording backend.
//!
//! Usage:
//!   cargo run --release --bin paint_session -- [--config licvol.json] [--size 64] [--frames 4]

use glam::Vec3;

use licvol::assets::{AssetProvider, BuiltinAssets, DirAssetProvider};
use licvol::brush::{BrushEditor, BrushEvent, InputPose};
use licvol::config::LicConfig;
use licvol::core::logging;
use licvol::field::VectorField;
use licvol::mask::VolumeMask;
use licvol::math::Grid;
use licvol::render::{LicVolumeRenderer, RecordingBackend, Slot};

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn main() -> licvol::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();

    let config = match arg_value(&args, "--config") {
        Some(path) => LicConfig::load(path)?,
        None => LicConfig::default(),
    };

    let size: u32 = arg_value(&args, "--size")
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    let frames: u32 = arg_value(&args, "--frames")
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);

    let grid = Grid::cube(size)?;
    let mut field = VectorField::from_fn(grid, |p| {
        let r = p - Vec3::splat(0.5);
        Vec3::new(-r.y, r.x, 0.2 * (1.0 - 2.0 * r.length()))
    });

    let assets: Box<dyn AssetProvider> = match &config.asset_dir {
        Some(dir) => Box::new(DirAssetProvider::new(dir)),
        None => Box::new(BuiltinAssets::default()),
    };

    let (renderer, report) = LicVolumeRenderer::new(grid, &config, assets.as_ref())?;
    for warning in &report.warnings {
        log::warn!("{:?} asset replaced: {}", warning.asset, warning.error);
    }

    let mut mask = VolumeMask::new();
    renderer.attach_mask(&mut mask)?;
    let mut brush = BrushEditor::with_radius(config.brush_radius)?;
    let mut ctx = renderer.create_context();
    let mut backend = RecordingBackend::new();

    for frame in 0..frames {
        // One diagonal stroke per frame across the middle of the domain
        let t0 = frame as f32 / frames.max(1) as f32;
        brush.handle(BrushEvent::Motion(InputPose::at(Vec3::new(0.2 + 0.6 * t0, 0.5, 0.5))), &mut mask);
        brush.handle(BrushEvent::Press, &mut mask);
        let mut touched = 0;
        for step in 1..=8 {
            let t = t0 + step as f32 / (8.0 * frames.max(1) as f32);
            let pose = InputPose::at(Vec3::new(0.2 + 0.6 * t, 0.5, 0.3 + 0.4 * t));
            if let Some(report) = brush.handle(BrushEvent::Motion(pose), &mut mask) {
                touched += report.touched;
            }
        }
        brush.handle(BrushEvent::Release, &mut mask);

        if frame % 2 == 1 {
            for v in field.samples_mut() {
                *v *= 1.1;
            }
            field.update_data();
        }

        let description = renderer.render_frame(&mut ctx, &field, Some(&mask), &mut backend)?;
        log::info!(
            "Frame {}: {} voxels touched, refreshed {:?}",
            frame, touched, description.refreshed
        );
    }

    brush.handle(BrushEvent::Deactivate, &mut mask);

    for slot in Slot::ALL {
        log::info!("{:?}: {} uploads", slot, backend.upload_count(slot));
    }
    log::info!("Encoder ran {} times for {} frames", ctx.encode_count(), frames);
    Ok(())
}

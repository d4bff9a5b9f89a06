//! Two-peer loopback demo.
//!
//! Simulates two users in one room: Alice sketches a stroke and drags out
//! a rectangle, her surface is broadcast after the debounce settles, and
//! Bob's surface picks it up through the in-memory hub. Run with
//! `RUST_LOG=debug` to watch the bridge work.

use kurbo::Point;
use sketchroom_core::{InteractionController, SceneModel, ToolConfig, ToolKind};
use sketchroom_render::{DrawSurface, PixelSurface, Renderer};
use sketchroom_sync::{Debounce, MemoryHub, SyncBridge};
use std::time::{Duration, Instant};

const SURFACE_SIZE: u32 = 256;

fn main() {
    env_logger::init();

    let hub = MemoryHub::new();
    let mut alice_channel = hub.endpoint();
    let mut bob_channel = hub.endpoint();

    let quiet = Duration::from_millis(50);
    let mut alice = SyncBridge::new("demo", 1).with_debounce(Debounce::new(quiet));
    let mut bob = SyncBridge::new("demo", 2).with_debounce(Debounce::new(quiet));

    let mut scene = SceneModel::new();
    let mut controller = InteractionController::new();
    let renderer = Renderer::new();
    let mut alice_surface = PixelSurface::new(SURFACE_SIZE, SURFACE_SIZE);
    let mut bob_surface = PixelSurface::new(SURFACE_SIZE, SURFACE_SIZE);

    // Alice sketches a diagonal pencil stroke
    let pencil = ToolConfig::default();
    controller.pointer_down(&mut scene, Point::new(20.0, 20.0), &pencil);
    for i in 1..=20 {
        let t = i as f64 * 8.0;
        controller.pointer_move(&mut scene, Point::new(20.0 + t, 20.0 + t * 0.6), &pencil);
    }
    controller.pointer_up(&mut scene);

    // then drags out a rectangle
    let rect = pencil.with_tool(ToolKind::Rectangle);
    controller.pointer_down(&mut scene, Point::new(60.0, 140.0), &rect);
    controller.pointer_move(&mut scene, Point::new(200.0, 220.0), &rect);
    controller.pointer_up(&mut scene);

    log::info!(
        "scene holds {} stroke(s) and {} element(s)",
        scene.stroke_count(),
        scene.element_count()
    );

    let now = Instant::now();
    renderer.render_if_dirty(&mut scene, Some(controller.pending_stroke()), &mut alice_surface);
    alice.observe(scene.revision(), now);

    // Let the debounce settle, then broadcast
    let settled = now + quiet;
    if alice.flush(settled, &alice_surface, &mut alice_channel) {
        log::info!("alice broadcast a {0}x{0} snapshot", SURFACE_SIZE);
    }

    let applied = bob.pump(&mut bob_channel, &mut bob_surface);
    log::info!("bob applied {applied} inbound frame(s)");

    match bob_surface.export_png() {
        Ok(png) => log::info!("bob's surface encodes to {} PNG bytes", png.len()),
        Err(err) => log::error!("snapshot export failed: {err}"),
    }

    alice.shutdown();
    bob.shutdown();
}

//! The sync bridge: debounced outbound snapshots, filtered inbound frames.

use crate::channel::RoomChannel;
use crate::debounce::{Debounce, SYNC_DEBOUNCE};
use crate::error::SyncError;
use crate::message::{decode_blob, encode_blob, WireMessage};
use sketchroom_render::{decode_png, DrawSurface};
use std::time::Instant;

/// Connects a local drawing surface to a room.
///
/// Outbound: the host calls [`observe`](SyncBridge::observe) with the
/// scene revision after each frame; once edits go quiet for the debounce
/// period, [`flush`](SyncBridge::flush) broadcasts one PNG snapshot of
/// the whole surface. Inbound: [`pump`](SyncBridge::pump) drains the
/// channel and paints peer snapshots directly onto the surface.
///
/// Failures never propagate to the caller; they are logged and the
/// affected frame is dropped, so local drawing keeps working while the
/// room is unreachable.
#[derive(Debug)]
pub struct SyncBridge {
    room: String,
    userid: u64,
    last_revision: u64,
    debounce: Debounce,
}

impl SyncBridge {
    pub fn new(room: impl Into<String>, userid: u64) -> Self {
        Self {
            room: room.into(),
            userid,
            last_revision: 0,
            debounce: Debounce::new(SYNC_DEBOUNCE),
        }
    }

    /// Override the debounce quiet period.
    pub fn with_debounce(mut self, debounce: Debounce) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn userid(&self) -> u64 {
        self.userid
    }

    /// Record the scene revision at `now`; a changed revision schedules a
    /// broadcast after the quiet period.
    pub fn observe(&mut self, revision: u64, now: Instant) {
        if revision != self.last_revision {
            self.last_revision = revision;
            self.debounce.notify(now);
        }
    }

    /// Whether a broadcast is scheduled.
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Broadcast a snapshot if the debounce deadline has passed.
    ///
    /// `surface` must hold the current frame; the host renders before
    /// flushing. Returns whether a snapshot went out.
    pub fn flush(
        &mut self,
        now: Instant,
        surface: &dyn DrawSurface,
        channel: &mut dyn RoomChannel,
    ) -> bool {
        if !self.debounce.ready(now) {
            return false;
        }
        match self.broadcast(surface, channel) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("snapshot broadcast dropped: {err}");
                false
            }
        }
    }

    fn broadcast(
        &self,
        surface: &dyn DrawSurface,
        channel: &mut dyn RoomChannel,
    ) -> Result<(), SyncError> {
        if !channel.is_connected() {
            return Err(SyncError::Connection);
        }
        let blob = encode_blob(&surface.export_png()?);
        let payload = WireMessage::Draw {
            room: self.room.clone(),
            userid: self.userid,
            blob,
        }
        .encode()?;
        channel.emit(&payload)?;
        log::debug!("broadcast snapshot to room {}", self.room);
        Ok(())
    }

    /// Drain the channel and paint accepted peer snapshots onto the
    /// surface. Returns the number of frames applied.
    ///
    /// A frame is accepted iff its room matches and its sender differs
    /// from this bridge's userid; everything else, own echoes included,
    /// is dropped. Snapshots are painted in arrival order, so the last
    /// one wins.
    pub fn pump(&mut self, channel: &mut dyn RoomChannel, surface: &mut dyn DrawSurface) -> usize {
        let mut applied = 0;
        for payload in channel.poll() {
            match self.apply_inbound(&payload, surface) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(err) => log::warn!("inbound frame dropped: {err}"),
            }
        }
        applied
    }

    fn apply_inbound(
        &self,
        payload: &str,
        surface: &mut dyn DrawSurface,
    ) -> Result<bool, SyncError> {
        let WireMessage::Draw { room, userid, blob } = WireMessage::decode(payload)?;
        if room != self.room || userid == self.userid {
            return Ok(false);
        }
        let (rgba, width, height) = decode_png(&decode_blob(&blob)?)?;
        surface.draw_image(&rgba, width, height)?;
        Ok(true)
    }

    /// Leave the room: any scheduled broadcast is abandoned.
    pub fn shutdown(&mut self) {
        self.debounce.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryHub;
    use kurbo::Point;
    use sketchroom_core::{Color, SceneModel, Stroke, StrokePoint};
    use sketchroom_render::{PixelSurface, Renderer};
    use std::time::Duration;

    const QUIET: Duration = Duration::from_millis(100);

    fn bridge(room: &str, userid: u64) -> SyncBridge {
        SyncBridge::new(room, userid).with_debounce(Debounce::new(QUIET))
    }

    fn dot_at(scene: &mut SceneModel, x: f64, y: f64) {
        scene.append_stroke(Stroke::from_points(vec![StrokePoint::new(
            Point::new(x, y),
            Color::black(),
            2.0,
            1.0,
        )]));
    }

    #[test]
    fn test_edit_burst_broadcasts_once() {
        let hub = MemoryHub::new();
        let mut channel = hub.endpoint();
        let mut observer = hub.endpoint();
        let mut bridge = bridge("studio", 1);

        let mut scene = SceneModel::new();
        let surface = PixelSurface::new(4, 4);
        let t0 = Instant::now();

        // Five quick edits inside the quiet window
        for i in 0..5 {
            dot_at(&mut scene, i as f64, i as f64);
            let t = t0 + Duration::from_millis(10 * i as u64);
            bridge.observe(scene.revision(), t);
            assert!(!bridge.flush(t, &surface, &mut channel));
        }

        let settled = t0 + Duration::from_millis(40) + QUIET;
        assert!(bridge.flush(settled, &surface, &mut channel));
        assert_eq!(observer.poll().len(), 1);

        // nothing further without new edits
        assert!(!bridge.flush(settled + QUIET, &surface, &mut channel));
    }

    #[test]
    fn test_unchanged_revision_schedules_nothing() {
        let hub = MemoryHub::new();
        let mut channel = hub.endpoint();
        let mut bridge = bridge("studio", 1);
        let surface = PixelSurface::new(4, 4);
        let t0 = Instant::now();

        bridge.observe(0, t0);
        assert!(!bridge.is_pending());
        assert!(!bridge.flush(t0 + QUIET, &surface, &mut channel));
    }

    #[test]
    fn test_own_echo_is_suppressed() {
        let hub = MemoryHub::new();
        let mut channel = hub.endpoint();
        let mut bridge = bridge("studio", 1);

        let mut scene = SceneModel::new();
        dot_at(&mut scene, 2.0, 2.0);
        let mut surface = PixelSurface::new(8, 8);
        Renderer::new().render(&scene, None, &mut surface);

        let t0 = Instant::now();
        bridge.observe(scene.revision(), t0);
        assert!(bridge.flush(t0 + QUIET, &surface, &mut channel));

        // the hub echoes the broadcast back to the sender
        let mut blank = PixelSurface::new(8, 8);
        assert_eq!(bridge.pump(&mut channel, &mut blank), 0);
        assert_eq!(blank.pixel(2, 2), Color::white());
    }

    #[test]
    fn test_two_peer_loopback() {
        let hub = MemoryHub::new();
        let mut alice_channel = hub.endpoint();
        let mut bob_channel = hub.endpoint();
        let mut alice = bridge("studio", 1);
        let mut bob = bridge("studio", 2);

        let mut scene = SceneModel::new();
        dot_at(&mut scene, 3.0, 3.0);
        let mut alice_surface = PixelSurface::new(8, 8);
        Renderer::new().render(&scene, None, &mut alice_surface);

        let t0 = Instant::now();
        alice.observe(scene.revision(), t0);
        assert!(alice.flush(t0 + QUIET, &alice_surface, &mut alice_channel));

        let mut bob_surface = PixelSurface::new(8, 8);
        assert_eq!(bob.pump(&mut bob_channel, &mut bob_surface), 1);
        assert_eq!(bob_surface.pixel(3, 3), Color::black());
    }

    #[test]
    fn test_other_room_is_ignored() {
        let hub = MemoryHub::new();
        let mut sender_channel = hub.endpoint();
        let mut receiver_channel = hub.endpoint();
        let mut sender = bridge("studio", 1);
        let mut receiver = bridge("atelier", 2);

        let mut scene = SceneModel::new();
        dot_at(&mut scene, 1.0, 1.0);
        let mut surface = PixelSurface::new(4, 4);
        Renderer::new().render(&scene, None, &mut surface);

        let t0 = Instant::now();
        sender.observe(scene.revision(), t0);
        assert!(sender.flush(t0 + QUIET, &surface, &mut sender_channel));

        let mut blank = PixelSurface::new(4, 4);
        assert_eq!(receiver.pump(&mut receiver_channel, &mut blank), 0);
    }

    #[test]
    fn test_malformed_inbound_is_dropped() {
        let hub = MemoryHub::new();
        let mut tap = hub.endpoint();
        let mut channel = hub.endpoint();
        let mut bridge = bridge("studio", 2);

        tap.emit("not json").unwrap();
        tap.emit("{\"type\":\"draw\",\"room\":\"studio\",\"userid\":\"alice\",\"blob\":\"%%%\"}")
            .unwrap();

        let mut surface = PixelSurface::new(4, 4);
        assert_eq!(bridge.pump(&mut channel, &mut surface), 0);
        // surface untouched
        assert_eq!(surface.pixel(0, 0), Color::white());
    }

    #[test]
    fn test_disconnected_flush_drops_silently() {
        let hub = MemoryHub::new();
        let mut channel = hub.endpoint();
        channel.disconnect();
        let mut bridge = bridge("studio", 1);
        let surface = PixelSurface::new(4, 4);

        let t0 = Instant::now();
        bridge.observe(1, t0);
        assert!(!bridge.flush(t0 + QUIET, &surface, &mut channel));
        // deadline consumed, no retry storm
        assert!(!bridge.is_pending());
    }

    #[test]
    fn test_shutdown_abandons_pending_broadcast() {
        let hub = MemoryHub::new();
        let mut channel = hub.endpoint();
        let mut observer = hub.endpoint();
        let mut bridge = bridge("studio", 1);
        let surface = PixelSurface::new(4, 4);

        let t0 = Instant::now();
        bridge.observe(1, t0);
        bridge.shutdown();
        assert!(!bridge.flush(t0 + QUIET, &surface, &mut channel));
        assert!(observer.poll().is_empty());
    }
}

use std::time::Instant;

/// Seconds between FPS estimates
pub const FPS_UPDATE_INTERVAL: f32 = 0.5;

/// Frame number and timing, handed to the canvas on every redraw
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Infinite iterator that yields frame information.
/// Call `next()` once per redraw.
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        Some(info)
    }
}

/// Frames-per-second estimate refreshed every [`FPS_UPDATE_INTERVAL`]
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u32,
    timer: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame. Returns the new estimate when it was refreshed.
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.timer += delta;

        if self.timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_numbers_increase() {
        let mut frames = FrameIterator::new();
        let first = frames.next().unwrap();
        let second = frames.next().unwrap();
        assert_eq!(first.number, 0);
        assert_eq!(second.number, 1);
        assert!(second.time >= first.time);
        assert_eq!(frames.frame_number(), 2);
    }

    #[test]
    fn test_fps_counter_updates_after_interval() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.tick(0.125), None);
        assert_eq!(counter.tick(0.125), None);
        assert_eq!(counter.tick(0.125), None);
        assert_eq!(counter.tick(0.125), Some(8.0));
        assert_eq!(counter.fps(), 8.0);
        assert_eq!(counter.tick(0.125), None);
    }
}

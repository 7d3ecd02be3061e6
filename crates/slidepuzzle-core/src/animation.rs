//! Shared frame cursor for animated boards.
//!
//! Every tile shows `frames[index]` for one shared index, so the whole
//! picture animates in sync. The cycle is a polled periodic task: the event
//! loop calls [`AnimationCycle::poll`] between input events and redraws on
//! every [`FrameTick`]. Starting a new task always cancels the previous one.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Playback speed used when none (or garbage) is configured
pub const DEFAULT_FPS: u32 = 30;
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 120;

/// Frames per second, always within `[MIN_FPS, MAX_FPS]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64")]
pub struct FramesPerSecond(u32);

impl From<i64> for FramesPerSecond {
    fn from(fps: i64) -> Self {
        Self::new(fps)
    }
}

impl Default for FramesPerSecond {
    fn default() -> Self {
        Self(DEFAULT_FPS)
    }
}

impl FramesPerSecond {
    /// Clamp any integer into the supported range
    pub fn new(fps: i64) -> Self {
        Self(fps.clamp(MIN_FPS as i64, MAX_FPS as i64) as u32)
    }

    /// Lenient parse of user input: unset or non-numeric falls back to the default
    pub fn parse(input: Option<&str>) -> Self {
        match input.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
            Some(fps) => Self::new(fps),
            None => Self::default(),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Time between two frames, truncated to whole milliseconds
    pub fn period(self) -> Duration {
        Duration::from_millis(1000 / self.0 as u64)
    }
}

impl std::fmt::Display for FramesPerSecond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} fps", self.0)
    }
}

/// Index into every tile's frame sequence, wrapping at `len`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
    len: usize,
}

impl FrameCursor {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of frames in one full cycle
    pub fn cycle_len(&self) -> usize {
        self.len
    }

    /// Step to the next frame and return it
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }
}

/// Identifies one scheduled cycle; ids are never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A due animation step: redraw every tile with `frames[index]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    pub task: TaskId,
    pub index: usize,
}

#[derive(Debug)]
struct AnimationTask {
    id: TaskId,
    cursor: FrameCursor,
    period: Duration,
    next_due: Instant,
}

/// At most one running animation schedule
#[derive(Debug, Default)]
pub struct AnimationCycle {
    task: Option<AnimationTask>,
    next_id: u64,
}

impl AnimationCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any running schedule with a new one.
    ///
    /// Static pictures (`frame_len <= 1`) schedule nothing and return `None`,
    /// but still cancel whatever was running before.
    pub fn start(
        &mut self,
        frame_len: usize,
        fps: FramesPerSecond,
        now: Instant,
    ) -> Option<TaskId> {
        self.cancel();
        if frame_len <= 1 {
            return None;
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;
        let period = fps.period();
        self.task = Some(AnimationTask {
            id,
            cursor: FrameCursor::new(frame_len),
            period,
            next_due: now + period,
        });
        log::debug!("animation task {:?} started: {} frames at {}", id, frame_len, fps);
        Some(id)
    }

    /// Drop the running schedule, returning its id
    pub fn cancel(&mut self) -> Option<TaskId> {
        let task = self.task.take()?;
        log::debug!("animation task {:?} cancelled", task.id);
        Some(task.id)
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn current_task(&self) -> Option<TaskId> {
        self.task.as_ref().map(|task| task.id)
    }

    /// Frame every tile should show right now
    pub fn frame_index(&self) -> usize {
        self.task.as_ref().map_or(0, |task| task.cursor.index())
    }

    /// How long the event loop may sleep before the next step is due
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.task
            .as_ref()
            .map(|task| task.next_due.saturating_duration_since(now))
    }

    /// Advance by one frame if a step is due.
    ///
    /// A late poll yields a single step; missed periods are dropped rather
    /// than replayed in a burst.
    pub fn poll(&mut self, now: Instant) -> Option<FrameTick> {
        let task = self.task.as_mut()?;
        if now < task.next_due {
            return None;
        }

        let index = task.cursor.advance();
        task.next_due += task.period;
        if task.next_due <= now {
            task.next_due = now + task.period;
        }
        Some(FrameTick {
            task: task.id,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_clamps_and_defaults() {
        assert_eq!(FramesPerSecond::new(0).get(), 1);
        assert_eq!(FramesPerSecond::new(-5).get(), 1);
        assert_eq!(FramesPerSecond::new(500).get(), 120);
        assert_eq!(FramesPerSecond::new(60).get(), 60);

        assert_eq!(FramesPerSecond::parse(None).get(), 30);
        assert_eq!(FramesPerSecond::parse(Some("fast")).get(), 30);
        assert_eq!(FramesPerSecond::parse(Some(" 24 ")).get(), 24);
        assert_eq!(FramesPerSecond::parse(Some("1000")).get(), 120);
    }

    #[test]
    fn test_fps_deserialize_clamps() {
        let slowest: FramesPerSecond = serde_json::from_str("0").unwrap();
        assert_eq!(slowest.get(), MIN_FPS);
        assert_eq!(slowest.period(), Duration::from_millis(1000));

        let fastest: FramesPerSecond = serde_json::from_str("100000").unwrap();
        assert_eq!(fastest.get(), MAX_FPS);
        let negative: FramesPerSecond = serde_json::from_str("-3").unwrap();
        assert_eq!(negative.get(), MIN_FPS);

        let json = serde_json::to_string(&FramesPerSecond::new(24)).unwrap();
        assert_eq!(json, "24");
        assert_eq!(serde_json::from_str::<FramesPerSecond>(&json).unwrap().get(), 24);
    }

    #[test]
    fn test_period() {
        assert_eq!(FramesPerSecond::new(30).period(), Duration::from_millis(33));
        assert_eq!(FramesPerSecond::new(1).period(), Duration::from_millis(1000));
        assert_eq!(FramesPerSecond::new(120).period(), Duration::from_millis(8));
    }

    #[test]
    fn test_two_frames_alternate() {
        let mut cycle = AnimationCycle::new();
        let t0 = Instant::now();
        let task = cycle.start(2, FramesPerSecond::new(30), t0).unwrap();
        let period = Duration::from_millis(33);

        assert_eq!(cycle.poll(t0), None);
        assert_eq!(cycle.frame_index(), 0);

        let mut seen = Vec::new();
        for step in 1..=4 {
            let tick = cycle.poll(t0 + period * step).unwrap();
            assert_eq!(tick.task, task);
            seen.push(tick.index);
        }
        assert_eq!(seen, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_single_frame_never_schedules() {
        let mut cycle = AnimationCycle::new();
        let t0 = Instant::now();
        assert_eq!(cycle.start(1, FramesPerSecond::default(), t0), None);
        assert!(!cycle.is_running());
        assert_eq!(cycle.poll(t0 + Duration::from_secs(10)), None);
        assert_eq!(cycle.time_until_next(t0), None);
    }

    #[test]
    fn test_restart_invalidates_old_task() {
        let mut cycle = AnimationCycle::new();
        let t0 = Instant::now();
        let first = cycle.start(3, FramesPerSecond::new(10), t0).unwrap();
        cycle.poll(t0 + Duration::from_millis(100));
        assert_eq!(cycle.frame_index(), 1);

        let second = cycle
            .start(4, FramesPerSecond::new(10), t0 + Duration::from_millis(150))
            .unwrap();
        assert_ne!(first, second);
        assert_eq!(cycle.frame_index(), 0);

        // Nothing is due on the old schedule's timing any more
        assert_eq!(cycle.poll(t0 + Duration::from_millis(200)), None);
        let tick = cycle.poll(t0 + Duration::from_millis(250)).unwrap();
        assert_eq!(tick.task, second);
        assert_eq!(tick.index, 1);

        // Restarting with a static picture leaves nothing running
        assert_eq!(cycle.start(1, FramesPerSecond::new(10), t0), None);
        assert_eq!(cycle.current_task(), None);
    }

    #[test]
    fn test_late_poll_steps_once() {
        let mut cycle = AnimationCycle::new();
        let t0 = Instant::now();
        cycle.start(5, FramesPerSecond::new(10), t0);

        let late = t0 + Duration::from_millis(1000);
        assert_eq!(cycle.poll(late).map(|tick| tick.index), Some(1));
        assert_eq!(cycle.poll(late), None);
        assert_eq!(cycle.time_until_next(late), Some(Duration::from_millis(100)));
    }
}

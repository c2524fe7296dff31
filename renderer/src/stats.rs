use std::time::Duration;

use log::info;

const SKIP_FRAMES: usize = 10;

/// What one call to `render` submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub instances: usize,
    pub draw_calls: usize,
}

/// Collects frame times and draw statistics, logs a summary when dropped.
///
/// The first frames include pipeline warmup and are skipped.
#[derive(Debug, Default)]
pub struct MeasureSeries {
    stats: Stats,
    frame: usize,
    max_draw_calls: usize,
    max_instances: usize,
}

impl MeasureSeries {
    pub fn add_sample(&mut self, duration: Duration, frame: FrameStats) {
        self.frame += 1;
        if self.frame <= SKIP_FRAMES {
            return;
        }

        self.stats.min = if self.stats.count == 0 {
            duration
        } else {
            self.stats.min.min(duration)
        };
        self.stats.max = self.stats.max.max(duration);
        self.stats.sum += duration;
        self.stats.count += 1;

        self.max_draw_calls = self.max_draw_calls.max(frame.draw_calls);
        self.max_instances = self.max_instances.max(frame.instances);
    }

    pub fn samples(&self) -> usize {
        self.stats.count
    }

    pub fn mean(&self) -> Option<Duration> {
        self.stats.mean()
    }
}

impl Drop for MeasureSeries {
    fn drop(&mut self) {
        let Some(mean) = self.stats.mean() else {
            return;
        };

        info!(
            "Frame times: mean: {:?} ({:?}-{:?}, {} samples, {} skipped), max {} instances in {} draw calls",
            mean,
            self.stats.min,
            self.stats.max,
            self.stats.count,
            SKIP_FRAMES,
            self.max_instances,
            self.max_draw_calls,
        )
    }
}

#[derive(Debug, Default)]
struct Stats {
    min: Duration,
    sum: Duration,
    max: Duration,
    count: usize,
}

impl Stats {
    fn mean(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as u32)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{FrameStats, MeasureSeries, SKIP_FRAMES};

    const FRAME: FrameStats = FrameStats {
        instances: 800,
        draw_calls: 1,
    };

    #[test]
    fn warmup_frames_are_skipped() {
        let mut series = MeasureSeries::default();
        for _ in 0..SKIP_FRAMES {
            series.add_sample(Duration::from_secs(1), FRAME);
        }
        assert_eq!(series.samples(), 0);
        assert_eq!(series.mean(), None);
    }

    #[test]
    fn mean_of_the_measured_frames() {
        let mut series = MeasureSeries::default();
        for _ in 0..SKIP_FRAMES {
            series.add_sample(Duration::from_secs(1), FRAME);
        }
        series.add_sample(Duration::from_millis(2), FRAME);
        series.add_sample(Duration::from_millis(4), FRAME);

        assert_eq!(series.samples(), 2);
        assert_eq!(series.mean(), Some(Duration::from_millis(3)));
    }
}

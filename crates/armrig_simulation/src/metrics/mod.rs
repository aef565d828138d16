//! Frame rate metrics
//!
//! FrameMetrics хранит последние FRAME_WINDOW frame times и раз в
//! report_interval секунд выдаёт средний FPS (FrameRateReport event).
//! Host (editor overlay, headless runner) подписывается на event.

use bevy::prelude::*;

/// Сколько последних frame'ов усредняем
pub const FRAME_WINDOW: usize = 60;

/// Каденс отчётов по умолчанию (секунды)
pub const DEFAULT_REPORT_INTERVAL: f32 = 0.25;

/// Event: средний FPS за окно
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRateReport {
    pub average_fps: u32,
}

/// Ring buffer frame times + таймер отчётов
#[derive(Resource, Debug, Clone)]
pub struct FrameMetrics {
    frame_times: [f32; FRAME_WINDOW],
    /// Следующий слот для записи
    index: usize,
    /// Сколько слотов уже заполнено (≤ FRAME_WINDOW)
    filled: usize,
    report_interval: f32,
    since_report: f32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_INTERVAL)
    }
}

impl FrameMetrics {
    pub fn new(report_interval: f32) -> Self {
        Self {
            frame_times: [0.0; FRAME_WINDOW],
            index: 0,
            filled: 0,
            report_interval,
            since_report: 0.0,
        }
    }

    pub fn report_interval(&self) -> f32 {
        self.report_interval
    }

    pub fn frame_count(&self) -> usize {
        self.filled
    }

    /// Записать frame time
    ///
    /// Возвращает средний FPS, если пора отчитаться.
    pub fn record(&mut self, delta: f32) -> Option<u32> {
        self.frame_times[self.index] = delta;
        self.index = (self.index + 1) % FRAME_WINDOW;
        self.filled = (self.filled + 1).min(FRAME_WINDOW);
        self.since_report += delta;

        if self.since_report < self.report_interval {
            return None;
        }

        // Не копим долг после длинного hitch'а
        self.since_report %= self.report_interval.max(f32::EPSILON);
        self.average_fps()
    }

    /// Средний FPS по заполненной части окна (None если данных нет)
    pub fn average_fps(&self) -> Option<u32> {
        if self.filled == 0 {
            return None;
        }

        let sum: f32 = self.frame_times[..self.filled].iter().sum();
        let average = sum / self.filled as f32;

        if average <= 0.0 {
            return None;
        }

        Some((1.0 / average).round() as u32)
    }
}

/// System: записать frame time, отправить отчёт по каденсу
pub fn track_frame_rate(
    time: Res<Time>,
    mut metrics: ResMut<FrameMetrics>,
    mut reports: EventWriter<FrameRateReport>,
) {
    if let Some(average_fps) = metrics.record(time.delta_secs()) {
        reports.write(FrameRateReport { average_fps });
    }
}

/// Metrics Plugin
///
/// `report_interval` задаёт каденс FrameRateReport (секунды).
pub struct MetricsPlugin {
    pub report_interval: f32,
}

impl Default for MetricsPlugin {
    fn default() -> Self {
        Self {
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

impl Plugin for MetricsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(FrameMetrics::new(self.report_interval))
            .add_event::<FrameRateReport>()
            .add_systems(Last, track_frame_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_report_before_interval() {
        let mut metrics = FrameMetrics::new(0.25);

        for _ in 0..10 {
            assert_eq!(metrics.record(1.0 / 60.0), None);
        }
        assert_eq!(metrics.frame_count(), 10);
    }

    #[test]
    fn test_report_average_fps() {
        let mut metrics = FrameMetrics::new(0.1);

        let reports: Vec<_> = (0..30).filter_map(|_| metrics.record(0.02)).collect();

        // 30 × 0.02 = 0.6 сек → ~6 отчётов, все 50 FPS
        assert!(reports.len() >= 5 && reports.len() <= 6, "reports = {:?}", reports);
        assert!(reports.iter().all(|fps| *fps == 50));
    }

    #[test]
    fn test_window_forgets_old_frames() {
        let mut metrics = FrameMetrics::new(1000.0);

        for _ in 0..FRAME_WINDOW {
            metrics.record(0.1); // 10 FPS
        }
        for _ in 0..FRAME_WINDOW {
            metrics.record(1.0 / 120.0);
        }

        assert_eq!(metrics.frame_count(), FRAME_WINDOW);
        assert_eq!(metrics.average_fps(), Some(120));
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = FrameMetrics::default();
        assert_eq!(metrics.average_fps(), None);
        assert_eq!(metrics.report_interval(), DEFAULT_REPORT_INTERVAL);
    }
}

//! Background button monitor.
//!
//! Polls the board buttons at a fixed cadence and mirrors K1, K2 and K4 on
//! the D4, D3 and D5 indicators. K3 blinks D2 and then runs a sniff capture
//! inline, so the monitor is blocked for the whole capture. The capture
//! holds the radio gate shared with the dispatcher. K3 is ignored while a
//! scan holds it.
//!
//! Cancellation is cooperative: the token is looked at once per iteration,
//! after the buttons have been handled and before the sleep.

use nfcprobe_core::ProbeConfig;
use nfcprobe_hardware::{Button, ButtonPanel, Indicator, Sniffer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

/// Buttons mirrored on an indicator every iteration.
const MIRRORED: [(Button, Indicator); 3] = [
    (Button::K1, Indicator::D4),
    (Button::K2, Indicator::D3),
    (Button::K4, Indicator::D5),
];

/// Timing of the monitor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub interval: Duration,
    pub blink_cycles: u32,
    pub blink_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::from(&ProbeConfig::default())
    }
}

impl From<&ProbeConfig> for MonitorConfig {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            interval: config.monitor_interval(),
            blink_cycles: config.blink_cycles,
            blink_interval: config.blink_interval(),
        }
    }
}

/// Button monitor, not yet running.
pub struct ButtonMonitor<P, S> {
    panel: Arc<P>,
    sniffer: Arc<S>,
    gate: Arc<Mutex<()>>,
    config: MonitorConfig,
}

impl<P, S> ButtonMonitor<P, S>
where
    P: ButtonPanel + 'static,
    S: Sniffer + 'static,
{
    /// `gate` is held for the duration of a K3 sniff.
    pub fn new(
        panel: Arc<P>,
        sniffer: Arc<S>,
        gate: Arc<Mutex<()>>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            panel,
            sniffer,
            gate,
            config,
        }
    }

    /// Spawn the monitor task on the current runtime.
    pub fn start(self) -> MonitorHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(self.run(token.clone()));
        info!("button monitor started");
        MonitorHandle {
            cancel: token.drop_guard(),
            task,
        }
    }

    async fn run(self, token: CancellationToken) {
        let mut iterations: u64 = 0;
        loop {
            for (button, indicator) in &MIRRORED[..2] {
                self.mirror(*button, *indicator);
            }

            if self.panel.is_pressed(Button::K3) {
                match self.gate.try_lock() {
                    Ok(_radio) => {
                        self.blink().await;
                        debug!("sniff triggered from K3");
                        self.sniffer.sniff(None).await;
                    }
                    Err(_) => debug!("K3 ignored, scan in progress"),
                }
            }

            let (button, indicator) = MIRRORED[2];
            self.mirror(button, indicator);

            iterations += 1;
            if token.is_cancelled() {
                break;
            }
            tokio::time::sleep(self.config.interval).await;
        }
        info!(iterations, "button monitor stopped");
    }

    fn mirror(&self, button: Button, indicator: Indicator) {
        self.panel
            .set_indicator(indicator, self.panel.is_pressed(button));
    }

    async fn blink(&self) {
        for _ in 0..self.config.blink_cycles {
            self.panel.set_indicator(Indicator::D2, true);
            tokio::time::sleep(self.config.blink_interval).await;
            self.panel.set_indicator(Indicator::D2, false);
            tokio::time::sleep(self.config.blink_interval).await;
        }
    }
}

/// Running monitor task.
///
/// Dropping the handle requests termination without waiting for it.
#[derive(Debug)]
pub struct MonitorHandle {
    cancel: DropGuard,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Request termination and wait for the current iteration to finish.
    pub async fn shutdown(self) {
        drop(self.cancel);
        if let Err(e) = self.task.await {
            warn!(error = %e, "button monitor did not stop cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfcprobe_hardware::mock::{MockPanel, MockSniffer};

    fn monitor(
        panel: &Arc<MockPanel>,
        sniffer: &Arc<MockSniffer>,
    ) -> ButtonMonitor<MockPanel, MockSniffer> {
        gated_monitor(panel, sniffer, Arc::new(Mutex::new(())))
    }

    fn gated_monitor(
        panel: &Arc<MockPanel>,
        sniffer: &Arc<MockSniffer>,
        gate: Arc<Mutex<()>>,
    ) -> ButtonMonitor<MockPanel, MockSniffer> {
        ButtonMonitor::new(
            Arc::clone(panel),
            Arc::clone(sniffer),
            gate,
            MonitorConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_buttons_are_mirrored() {
        let panel = Arc::new(MockPanel::new());
        let sniffer = Arc::new(MockSniffer::new());
        panel.press(Button::K1);
        panel.press(Button::K4);

        let handle = monitor(&panel, &sniffer).start();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(panel.indicator(Indicator::D4));
        assert!(!panel.indicator(Indicator::D3));
        assert!(panel.indicator(Indicator::D5));

        panel.release(Button::K1);
        panel.press(Button::K2);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!panel.indicator(Indicator::D4));
        assert!(panel.indicator(Indicator::D3));
        assert_eq!(sniffer.runs(), 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_every_interval() {
        let panel = Arc::new(MockPanel::new());
        let sniffer = Arc::new(MockSniffer::new());

        let handle = monitor(&panel, &sniffer).start();
        tokio::time::sleep(Duration::from_millis(450)).await;
        handle.shutdown().await;

        // Iterations at 0, 100, 200, 300, 400 and one more after cancel.
        assert_eq!(panel.reads(Button::K1), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_k3_blinks_then_sniffs() {
        let panel = Arc::new(MockPanel::new());
        let sniffer = Arc::new(MockSniffer::new());
        panel.press(Button::K3);

        let handle = monitor(&panel, &sniffer).start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.shutdown().await;

        assert_eq!(sniffer.runs(), 1);
        assert_eq!(sniffer.runs_with_console(), 0);
        let blinks: Vec<bool> = panel
            .indicator_history()
            .into_iter()
            .filter(|(indicator, _)| *indicator == Indicator::D2)
            .map(|(_, on)| on)
            .collect();
        assert_eq!(blinks, [true, false].repeat(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_k3_ignored_while_scanning() {
        let panel = Arc::new(MockPanel::new());
        let sniffer = Arc::new(MockSniffer::new());
        let gate = Arc::new(Mutex::new(()));
        let scanning = Arc::clone(&gate).lock_owned().await;
        panel.press(Button::K3);

        let handle = gated_monitor(&panel, &sniffer, gate).start();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(sniffer.runs(), 0);
        assert!(!panel.indicator_history().iter().any(|(i, _)| *i == Indicator::D2));

        drop(scanning);
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown().await;

        assert!(sniffer.runs() >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sniff_blocks_shutdown() {
        let panel = Arc::new(MockPanel::new());
        let sniffer = Arc::new(MockSniffer::with_capture_time(Duration::from_secs(2)));
        panel.press(Button::K3);

        let handle = monitor(&panel, &sniffer).start();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let requested = tokio::time::Instant::now();
        handle.shutdown().await;

        // Blink ends at 200 ms, the 2 s capture at 2200 ms.
        assert!(requested.elapsed() >= Duration::from_millis(1900));
        assert_eq!(sniffer.runs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_requests_termination() {
        let panel = Arc::new(MockPanel::new());
        let sniffer = Arc::new(MockSniffer::new());

        let handle = monitor(&panel, &sniffer).start();
        let MonitorHandle { cancel, task } = handle;
        drop(cancel);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("monitor should stop")
            .unwrap();
    }

    #[test]
    fn test_config_from_probe_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.interval, Duration::from_millis(100));
        assert_eq!(config.blink_cycles, 4);
        assert_eq!(config.blink_interval, Duration::from_millis(25));
    }
}

use geom::Duration;

/// A cancellable fixed-interval timer, advanced manually by whoever owns
/// the event loop. The refresh cadence is deliberately independent of
/// how often the feed produces new data: extra ticks against a stale
/// batch keep easing displayed positions toward their targets, which is
/// what makes the motion look continuous.
pub struct RefreshScheduler {
    interval: Duration,
    since_last: Duration,
    running: bool,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_last: Duration::ZERO,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Also clears any partially-elapsed interval, so a later start()
    /// begins a fresh cycle instead of firing a leftover tick.
    pub fn stop(&mut self) {
        self.running = false;
        self.since_last = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record elapsed wall-clock time, returning how many ticks came
    /// due. A long gap (say the window was minimized) yields several.
    pub fn advance(&mut self, dt: Duration) -> usize {
        if !self.running {
            return 0;
        }
        self.since_last = self.since_last + dt;
        let mut ticks = 0;
        while self.since_last >= self.interval {
            self.since_last = self.since_last - self.interval;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ticks_until_started() {
        let mut scheduler = RefreshScheduler::new(Duration::seconds(1.0));
        assert_eq!(scheduler.advance(Duration::seconds(5.0)), 0);
        scheduler.start();
        assert_eq!(scheduler.advance(Duration::seconds(1.0)), 1);
    }

    #[test]
    fn partial_intervals_accumulate() {
        let mut scheduler = RefreshScheduler::new(Duration::seconds(1.0));
        scheduler.start();
        assert_eq!(scheduler.advance(Duration::seconds(0.4)), 0);
        assert_eq!(scheduler.advance(Duration::seconds(0.4)), 0);
        assert_eq!(scheduler.advance(Duration::seconds(0.4)), 1);
    }

    #[test]
    fn a_long_gap_yields_several_ticks() {
        let mut scheduler = RefreshScheduler::new(Duration::seconds(1.0));
        scheduler.start();
        assert_eq!(scheduler.advance(Duration::seconds(3.5)), 3);
        assert_eq!(scheduler.advance(Duration::seconds(0.5)), 1);
    }

    #[test]
    fn stop_clears_pending_time() {
        let mut scheduler = RefreshScheduler::new(Duration::seconds(1.0));
        scheduler.start();
        assert_eq!(scheduler.advance(Duration::seconds(0.9)), 0);
        scheduler.stop();
        assert_eq!(scheduler.advance(Duration::seconds(5.0)), 0);
        scheduler.start();
        // The 0.9s from before stop() doesn't count toward this cycle
        assert_eq!(scheduler.advance(Duration::seconds(0.5)), 0);
        assert_eq!(scheduler.advance(Duration::seconds(0.5)), 1);
    }
}

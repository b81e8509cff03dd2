use std::time::Duration;

use tracing::debug;

use mote_link::LinkLayer;

/// Platform sleep for whole seconds. Once started, a sleep runs for the
/// full requested duration; there is no cancellation path.
pub trait SleepTimer {
    fn sleep(&mut self, seconds: u32);
}

/// Host-side timer backed by a blocking thread sleep.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdSleepTimer;

impl SleepTimer for StdSleepTimer {
    fn sleep(&mut self, seconds: u32) {
        std::thread::sleep(Duration::from_secs(u64::from(seconds)));
    }
}

/// Test timer recording requested intervals without blocking.
#[derive(Debug, Default, Clone)]
pub struct ManualSleepTimer {
    slept: Vec<u32>,
}

impl ManualSleepTimer {
    /// Every interval requested so far, in order.
    pub fn slept(&self) -> &[u32] {
        &self.slept
    }
}

impl SleepTimer for ManualSleepTimer {
    fn sleep(&mut self, seconds: u32) {
        self.slept.push(seconds);
    }
}

/// Sleeps for `seconds` with the radio quiesced.
///
/// The low-power request is made only when no network operation is
/// pending; the wake request afterwards is unconditional, so the radio is
/// always usable again once the interval has elapsed.
pub fn sleep_with_radio<L: LinkLayer, T: SleepTimer>(link: &mut L, timer: &mut T, seconds: u32) {
    if !link.is_busy() {
        link.request_sleep();
    }
    debug!(seconds, "entering low-power sleep");
    timer.sleep(seconds);
    link.request_wake();
}

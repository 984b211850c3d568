use chrono::Utc;

/// Source of the default `created` timestamp of a receipt.
pub trait Clock {
    fn now_millis(&self) -> u64;

    fn now_secs(&self) -> u64 {
        self.now_millis() / 1000
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // before the epoch only on a badly set clock
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Always reports the same instant, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

#[test]
fn test_clock_units() {
    let clock = FixedClock(1_492_754_385_999);
    assert_eq!(clock.now_secs(), 1_492_754_385);
    assert!(SystemClock.now_secs() > 1_492_754_385);
}

//! A time source injected into otherwise-pure logic instead of read directly
//! from `SystemTime::now()` — mirrors the teacher's pattern of passing
//! time-like inputs (`RiskInput::day_id`) into deterministic evaluators
//! rather than letting them read the clock themselves.

/// Seconds since the Unix epoch, real-valued (matches the source's
/// `time.time()` wall-clock timestamps used in cooldown/placement records).
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_secs_f64()
    }
}

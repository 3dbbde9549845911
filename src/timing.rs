use std::time::{Duration, Instant};

/// Wall-clock timer reporting fractional milliseconds.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_ms(&self) -> f64 {
        duration_ms(self.elapsed())
    }
}

#[inline]
pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Runs `f` once, returning its result and how long it took in milliseconds.
pub fn time_ms<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let watch = Stopwatch::start();
    let out = f();
    (out, watch.elapsed_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_millis() {
        assert_eq!(duration_ms(Duration::from_secs(3)), 3000.0);
        assert_eq!(duration_ms(Duration::from_millis(500)), 500.0);
        assert_eq!(duration_ms(Duration::ZERO), 0.0);
    }

    #[test]
    fn time_ms_passes_result_through() {
        let (value, ms) = time_ms(|| 6 * 7);
        assert_eq!(value, 42);
        assert!(ms >= 0.0);
    }
}

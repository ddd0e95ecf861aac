//! Scoped timers for the hot paths of the search.
//!
//! With the `profiling` feature, every [`Timer`] adds its lifetime to a
//! per-label total that [`report`] prints. Without it the timers compile to
//! nothing.

#[cfg(feature = "profiling")]
mod enabled {
    use std::sync::OnceLock;
    use std::time::Instant;

    use dashmap::DashMap;
    use itertools::Itertools;

    /// Accumulated samples of one label.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Sample {
        /// Timers dropped.
        pub calls: u64,
        /// Summed lifetimes.
        pub nanos: u128,
    }

    static SAMPLES: OnceLock<DashMap<&'static str, Sample>> = OnceLock::new();

    fn samples() -> &'static DashMap<&'static str, Sample> {
        SAMPLES.get_or_init(DashMap::new)
    }

    /// Adds the time between its creation and drop to `label`.
    pub struct Timer {
        label: &'static str,
        start: Instant,
    }

    impl Timer {
        /// Starts timing `label`.
        #[inline]
        #[must_use]
        pub fn new(label: &'static str) -> Self {
            Self {
                label,
                start: Instant::now(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let mut sample = samples().entry(self.label).or_default();
            sample.calls += 1;
            sample.nanos += self.start.elapsed().as_nanos();
        }
    }

    /// Samples recorded for `label`.
    #[must_use]
    pub fn totals(label: &'static str) -> Option<Sample> {
        samples().get(label).map(|s| *s)
    }

    /// Prints every label, most expensive first.
    pub fn report() {
        println!("==== subiso search profile ====");
        for (label, s) in samples()
            .iter()
            .map(|kv| (*kv.key(), *kv.value()))
            .sorted_by(|a, b| b.1.nanos.cmp(&a.1.nanos))
        {
            let avg_ns = s.nanos as f64 / s.calls.max(1) as f64;
            println!(
                "{label:<32} calls={:<10} total={:>9.3} ms avg={avg_ns:>10.1} ns",
                s.calls,
                s.nanos as f64 / 1e6
            );
        }
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    /// Never constructed: nothing is recorded without the feature.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Sample {
        /// Timers dropped.
        pub calls: u64,
        /// Summed lifetimes.
        pub nanos: u128,
    }

    /// No-op timer.
    #[derive(Clone, Copy)]
    pub struct Timer;

    impl Timer {
        /// Does nothing.
        #[inline]
        #[must_use]
        pub const fn new(_: &'static str) -> Self {
            Self
        }
    }

    /// Always `None`.
    #[must_use]
    pub const fn totals(_: &'static str) -> Option<Sample> {
        None
    }

    /// Does nothing.
    pub const fn report() {}
}

#[cfg(feature = "profiling")]
pub use enabled::*;

#[cfg(not(feature = "profiling"))]
pub use disabled::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_records_when_enabled() {
        {
            let _t = Timer::new("profiling::test");
        }
        let sample = totals("profiling::test");
        if cfg!(feature = "profiling") {
            assert!(sample.is_some_and(|s| s.calls >= 1));
        } else {
            assert!(sample.is_none());
        }
        report();
    }
}

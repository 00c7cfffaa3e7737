//! Timing knob for workers and tests. Pauses are explicit and injectable so
//! a scenario can widen race windows on purpose, instead of leaning on a
//! busy loop the optimizer is free to delete.

use std::thread::sleep;
use std::time::Duration;

use rand::Rng;

#[derive(Clone, Copy, Debug, Default)]
pub enum Delay {
    /// no pause at all
    #[default]
    None,
    /// sleep exactly this long
    Fixed(Duration),
    /// sleep a random duration up to this bound, fresh on every pause
    UpTo(Duration),
}

impl Delay {
    pub fn pause(&self) {
        match *self {
            Delay::None => {}
            Delay::Fixed(d) => sleep(d),
            Delay::UpTo(bound) => {
                let max = bound.as_millis() as u64;
                if max > 0 {
                    sleep(Duration::from_millis(rand::thread_rng().gen_range(0..=max)));
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_fixed_sleeps_at_least_its_duration() {
        let started = Instant::now();
        Delay::Fixed(Duration::from_millis(30)).pause();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_none_and_jitter_return_promptly() {
        Delay::None.pause();
        Delay::UpTo(Duration::ZERO).pause();
        let started = Instant::now();
        Delay::UpTo(Duration::from_millis(20)).pause();
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}

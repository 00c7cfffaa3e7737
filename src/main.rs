use std::env::args;
use std::str::FromStr;
use std::string::ToString;
use std::time::Duration;

use env_logger::Env;
use strum::IntoEnumIterator;
use strum_macros::{self, Display, EnumIter, EnumString};

use writer_priority_rwlock::delay::Delay;
use writer_priority_rwlock::driver::{Driver, SpawnOrder};

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    args()
        .nth(1)
        .ok_or(format!(
            "no scenario supplied, use one of {}",
            Scenario::iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>()
                .join(",")
        ))
        .and_then(|selector| {
            Scenario::from_str(&selector)
                .map(|scenario| {
                    let end = scenario.driver().run();
                    log::info!("scenario {scenario} finished with {end:?}");
                })
                .map_err(|e| e.to_string())
        })
}

/// The two bundled demonstrations: readers created strictly before writers,
/// and a shuffled mixed load with staggered thread creation.
#[derive(Clone, Copy, EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
enum Scenario {
    Ordered,
    Shuffled,
}

impl Scenario {
    fn driver(&self) -> Driver {
        match self {
            Scenario::Ordered => Driver {
                readers: 5,
                writers: 2,
                order: SpawnOrder::ReadersFirst,
                spawn_delay: Delay::None,
                work_delay: Delay::Fixed(Duration::from_millis(20)),
            },
            Scenario::Shuffled => Driver {
                readers: 5,
                writers: 10,
                order: SpawnOrder::Shuffled,
                spawn_delay: Delay::UpTo(Duration::from_millis(10)),
                work_delay: Delay::UpTo(Duration::from_millis(25)),
            },
        }
    }
}

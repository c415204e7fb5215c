use std::time::Duration;

pub(crate) const DEFAULT_LAYOUT: &str = include_str!("../assets/layout.txt");

/// Как часто консольный ввод проверяет флаг shutdown
pub(crate) const INPUT_TICK: Duration = Duration::from_millis(200);

/// Ёмкость канала строк stdin
pub(crate) const INPUT_BUFFER: usize = 64;

pub(crate) use parking_core::{BIKE_RATE_PER_HOUR, CAR_RATE_PER_HOUR};

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Источник текущего времени. В проде `SystemClock`, в тестах — фиксированное время.
pub trait Clock: Send + Sync {
    /// Текущее время
    fn now(&self) -> DateTime<Utc>;
}

/// Системные часы
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Часы, которые двигаются только вручную.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Часы, стоящие на `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Сдвинуть время вперёд (или назад, при отрицательном `by`)
    pub fn advance(&self, by: Duration) {
        let mut now = match self.now.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *now += by;
    }

    /// Поставить конкретное время
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = match self.now.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *now = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

//! # parking-core
//!
//! Ядро парковки: выдача мест, жизненный цикл тикетов и расчёт тарифа.
//!
//! Этот крейт содержит:
//!
//! - [`fare`] — расчёт стоимости стоянки (бесплатные полчаса, скидка 5%)
//! - [`allocator`] — выдача и освобождение мест поверх [`store::SpotStore`]
//! - [`service`] — въезд/выезд: место -> тикет -> тариф -> освобождение места
//! - [`store`] — контракты хранилищ тикетов и мест
//! - [`memory`] — потокобезопасные in-memory хранилища
//! - [`input`] — контракт источника ввода и готовый скриптовый источник
//! - [`layout`] — чтение схемы парковки (`CAR 3`, `BIKE 2`)
//! - [`wire`] — версионированный снапшот хранилищ (версия + postcard payload)
//! - [`types`] — доменные типы
//! - [`error`] — типы ошибок
//!
//! ## Быстрый пример: тариф
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use parking_core::{FareCalculator, ParkingSpot, ParkingType, Ticket};
//!
//! let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
//! let mut ticket = Ticket::open("AB-123-CD", ParkingSpot::new(1, ParkingType::Car, false), t0);
//! ticket.out_time = Some(t0 + Duration::hours(24));
//!
//! let price = FareCalculator::default().calculate_fare(&mut ticket, false).unwrap();
//! assert!((price - 23.5 * parking_core::CAR_RATE_PER_HOUR).abs() < 1e-9);
//! ```
//!
//! ## Пример: въезд и выезд
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use parking_core::clock::ManualClock;
//! use parking_core::input::ScriptedInput;
//! use parking_core::layout::{build_spots, parse_layout_csv};
//! use parking_core::memory::{InMemorySpotStore, InMemoryTicketStore};
//! use parking_core::{EntryOutcome, FareCalculator, ParkingService, ParkingType};
//!
//! let spots = build_spots(&parse_layout_csv("CAR:3,BIKE:2").unwrap()).unwrap();
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
//! let svc = ParkingService::with_clock(
//!     InMemoryTicketStore::new(),
//!     InMemorySpotStore::new(spots),
//!     FareCalculator::default(),
//!     clock,
//! );
//!
//! let outcome = svc
//!     .process_incoming_vehicle(&mut ScriptedInput::new(["1", "AB-123-CD"]))
//!     .unwrap();
//! assert!(matches!(outcome, EntryOutcome::Parked(ref t) if t.spot.as_ref().unwrap().id == 1));
//! assert_eq!(svc.available_spots(ParkingType::Car).unwrap(), 2);
//!
//! let receipt = svc
//!     .process_exiting_vehicle(&mut ScriptedInput::new(["AB-123-CD"]))
//!     .unwrap();
//! // уехал в ту же минуту — бесплатно
//! assert_eq!(receipt.price, 0.0);
//! assert_eq!(svc.available_spots(ParkingType::Car).unwrap(), 3);
//! ```
//!
//! ## Дизайн
//!
//! Хранилища и ввод — внешние коллабораторы за трейтами. Id тикетов и
//! доступность мест принадлежат хранилищу (счётчик под замком, CAS), а не
//! глобальному состоянию процесса. Логирование через фасад `log`, логгер
//! инициализирует бинарник.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Выдача и освобождение мест.
pub mod allocator;

/// Источник текущего времени.
pub mod clock;

/// Ошибки `parking-core`.
pub mod error;

/// Расчёт тарифа.
pub mod fare;

/// Источник пользовательского ввода.
pub mod input;

/// Схема парковки.
pub mod layout;

/// In-memory хранилища.
pub mod memory;

/// Въезд/выезд.
pub mod service;

/// Контракты хранилищ.
pub mod store;

/// Доменные типы.
pub mod types;

/// Снапшот хранилищ.
pub mod wire;

/// Общие константы
mod constants;
pub use constants::{
    BIKE_RATE_PER_HOUR, CAR_RATE_PER_HOUR, CLAIM_RETRY_LIMIT, FREE_DURATION_HOURS,
    RECURRING_USER_DISCOUNT,
};

// --- Re-exports (публичный фасад API) ---

pub use crate::error::{FareError, InputError, LayoutError, ParkingError, SnapshotError, StoreError};
pub use crate::fare::{FareCalculator, FareSchedule};
pub use crate::service::{EntryOutcome, ExitReceipt, ParkingService};
pub use crate::types::{ParkingSpot, ParkingType, SpotId, Ticket, TicketId};

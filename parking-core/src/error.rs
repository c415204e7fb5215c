use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::service::ExitReceipt;
use crate::types::{ParkingType, SpotId, TicketId};

/// Верхнеуровневый тип ошибок крейта
#[derive(Debug, Error)]
pub enum ParkingError {
    /// Некорректный ввод (пустой номер, неизвестная категория)
    #[error(transparent)]
    Input(#[from] InputError),

    /// Ошибки расчёта тарифа
    #[error(transparent)]
    Fare(#[from] FareError),

    /// Ошибки хранилищ
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Выезд без открытого тикета
    #[error("no open ticket for vehicle {0}")]
    UnknownTicket(String),

    /// Повторный въезд при открытой сессии
    #[error("vehicle {0} is already parked")]
    AlreadyParked(String),

    /// Тикет закрыт и оплачен, но место не удалось освободить
    #[error("ticket closed, but spot {spot_id} could not be released: {source}")]
    SpotReleaseFailed {
        /// Квитанция по уже закрытому тикету
        receipt: Box<ExitReceipt>,
        /// Место, которое осталось занятым
        spot_id: SpotId,
        /// Ошибка хранилища мест
        source: StoreError,
    },
}

/// Ошибки ввода
#[derive(Debug, Error)]
pub enum InputError {
    /// Пустой госномер
    #[error("vehicle registration number is empty")]
    EmptyRegistration,

    /// Неизвестная категория / пункт меню
    #[error("unknown vehicle type selection: {0:?}")]
    UnknownSelection(String),

    /// Источник ввода закрыт (EOF или остановка)
    #[error("input closed")]
    Closed,

    /// Ошибка чтения
    #[error("input read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ошибки расчёта тарифа
#[derive(Debug, Error, PartialEq)]
pub enum FareError {
    /// Время выезда не проставлено
    #[error("out time is not set")]
    MissingOutTime,

    /// Время выезда раньше времени въезда
    #[error("out time {out_time} is before in time {in_time}")]
    InvalidTimeRange {
        /// Время въезда
        in_time: DateTime<Utc>,
        /// Время выезда
        out_time: DateTime<Utc>,
    },

    /// У тикета нет категории места
    #[error("unknown parking type")]
    UnknownCategory,

    /// Отрицательный или нечисловой параметр тарифной сетки
    #[error("invalid fare schedule: {field} = {value}")]
    InvalidSchedule {
        /// Имя параметра
        field: &'static str,
        /// Переданное значение
        value: f64,
    },
}

/// Ошибки хранилищ тикетов и мест
#[derive(Debug, Error)]
pub enum StoreError {
    /// Нет такого места
    #[error("parking spot not found: {0}")]
    SpotNotFound(SpotId),

    /// Нет такого тикета
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// У машины уже есть открытый тикет
    #[error("open ticket already exists for vehicle {0}")]
    OpenTicketExists(String),

    /// Тикет уже закрыт
    #[error("ticket {0} is already closed")]
    TicketClosed(TicketId),

    /// Аллокатор не смог захватить место за разумное число попыток
    #[error("too much contention while claiming a {0} spot")]
    Contention(ParkingType),

    /// Прочие ошибки бэкенда
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Ошибки разбора схемы парковки
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Строка не в формате `CATEGORY COUNT`
    #[error("malformed layout entry at line {line}: {raw:?}")]
    Malformed {
        /// Номер строки (с 1)
        line: usize,
        /// Исходная строка
        raw: String,
    },

    /// Неизвестная категория
    #[error("unknown parking type in layout: {0:?}")]
    UnknownCategory(String),

    /// В схеме нет ни одного места
    #[error("layout has no spots")]
    Empty,

    /// Ошибка чтения
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Ошибки снапшота
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Слишком короткие данные
    #[error("snapshot too short")]
    TooShort,

    /// Неверная версия формата
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u8),

    /// Ошибка сериализации/десериализации
    #[error("postcard encode/decode error: {0}")]
    Postcard(#[from] postcard::Error),
}

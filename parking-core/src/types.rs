use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Идентификатор парковочного места (уникален в пределах парковки)
pub type SpotId = u32;

/// Идентификатор тикета (выдаёт хранилище)
pub type TicketId = u64;

/// Категория транспорта / места.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParkingType {
    /// Автомобиль
    Car,
    /// Мотоцикл
    Bike,
}

impl ParkingType {
    /// Все категории в порядке нумерации мест
    pub const ALL: [ParkingType; 2] = [ParkingType::Car, ParkingType::Bike];

    /// Пункт меню: `1` -> CAR, `2` -> BIKE
    pub fn from_selection(raw: &str) -> Result<Self, InputError> {
        match raw.trim() {
            "1" => Ok(ParkingType::Car),
            "2" => Ok(ParkingType::Bike),
            other => Err(InputError::UnknownSelection(other.to_string())),
        }
    }
}

impl fmt::Display for ParkingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParkingType::Car => f.write_str("CAR"),
            ParkingType::Bike => f.write_str("BIKE"),
        }
    }
}

impl FromStr for ParkingType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("CAR") {
            Ok(ParkingType::Car)
        } else if s.eq_ignore_ascii_case("BIKE") {
            Ok(ParkingType::Bike)
        } else {
            Err(InputError::UnknownSelection(s.to_string()))
        }
    }
}

/// Парковочное место
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    /// Номер места
    pub id: SpotId,
    /// Категория
    pub category: ParkingType,
    /// Свободно ли место
    pub available: bool,
}

impl ParkingSpot {
    /// Место с заданными полями
    pub fn new(id: SpotId, category: ParkingType, available: bool) -> Self {
        Self {
            id,
            category,
            available,
        }
    }
}

/// Тикет парковочной сессии.
///
/// `out_time == None` означает, что машина всё ещё на парковке.
/// `spot` — снимок места на момент въезда, а не живая ссылка.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// 0 до сохранения
    pub id: TicketId,
    /// Госномер, ключ активной сессии
    pub vehicle_reg_number: String,
    /// Снимок места; `None` => категория неизвестна, тариф не посчитать
    pub spot: Option<ParkingSpot>,
    /// Время въезда
    pub in_time: DateTime<Utc>,
    /// Время выезда, `None` пока сессия открыта
    pub out_time: Option<DateTime<Utc>>,
    /// Выставляется только после `out_time`
    pub price: Option<f64>,
    /// У номера были тикеты раньше
    pub is_recurring_user: bool,
}

impl Ticket {
    /// Новый открытый тикет; `id` проставит хранилище при `save`.
    pub fn open(vehicle_reg_number: impl Into<String>, spot: ParkingSpot, in_time: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            vehicle_reg_number: vehicle_reg_number.into(),
            spot: Some(spot),
            in_time,
            out_time: None,
            price: None,
            is_recurring_user: false,
        }
    }

    /// Машина ещё на парковке
    pub fn is_open(&self) -> bool {
        self.out_time.is_none()
    }

    /// Категория места, если снимок места есть
    pub fn category(&self) -> Option<ParkingType> {
        self.spot.as_ref().map(|s| s.category)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spot = match &self.spot {
            Some(s) => format!("{}#{}", s.category, s.id),
            None => "-".to_string(),
        };
        write!(
            f,
            "ticket={} vehicle={} spot={} in={}",
            self.id,
            self.vehicle_reg_number,
            spot,
            self.in_time.format("%Y-%m-%d %H:%M:%S")
        )?;
        if let Some(out) = self.out_time {
            write!(f, " out={}", out.format("%Y-%m-%d %H:%M:%S"))?;
        }
        if let Some(price) = self.price {
            write!(f, " price={price:.2}")?;
        }
        Ok(())
    }
}

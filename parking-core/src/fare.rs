use log::debug;

use crate::constants::{
    BIKE_RATE_PER_HOUR, CAR_RATE_PER_HOUR, FREE_DURATION_HOURS, RECURRING_USER_DISCOUNT,
};
use crate::error::FareError;
use crate::types::{ParkingType, Ticket};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Тарифная сетка парковки
#[derive(Debug, Clone, PartialEq)]
pub struct FareSchedule {
    /// Тариф для CAR, за час
    pub car_rate_per_hour: f64,
    /// Тариф для BIKE, за час
    pub bike_rate_per_hour: f64,
    /// Бесплатное время, в часах
    pub free_duration_hours: f64,
    /// Доля скидки постоянного клиента (0.05 = 5%)
    pub recurring_discount: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            car_rate_per_hour: CAR_RATE_PER_HOUR,
            bike_rate_per_hour: BIKE_RATE_PER_HOUR,
            free_duration_hours: FREE_DURATION_HOURS,
            recurring_discount: RECURRING_USER_DISCOUNT,
        }
    }
}

impl FareSchedule {
    /// Тариф категории. Новая категория без тарифа не скомпилируется.
    pub fn rate_for(&self, category: ParkingType) -> f64 {
        match category {
            ParkingType::Car => self.car_rate_per_hour,
            ParkingType::Bike => self.bike_rate_per_hour,
        }
    }

    /// Цена не должна уйти в минус: все параметры конечные и неотрицательные,
    /// скидка не больше 1.
    pub fn validate(&self) -> Result<(), FareError> {
        let fields = [
            ("car_rate_per_hour", self.car_rate_per_hour),
            ("bike_rate_per_hour", self.bike_rate_per_hour),
            ("free_duration_hours", self.free_duration_hours),
            ("recurring_discount", self.recurring_discount),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FareError::InvalidSchedule { field, value });
            }
        }
        if self.recurring_discount > 1.0 {
            return Err(FareError::InvalidSchedule {
                field: "recurring_discount",
                value: self.recurring_discount,
            });
        }
        Ok(())
    }
}

/// Расчёт стоимости стоянки по тикету.
#[derive(Debug, Clone, Default)]
pub struct FareCalculator {
    schedule: FareSchedule,
}

impl FareCalculator {
    /// Калькулятор с заданной тарифной сеткой; некорректная сетка отклоняется
    pub fn new(schedule: FareSchedule) -> Result<Self, FareError> {
        schedule.validate()?;
        Ok(Self { schedule })
    }

    /// Текущая тарифная сетка
    pub fn schedule(&self) -> &FareSchedule {
        &self.schedule
    }

    /// Считает цену и записывает её в `ticket.price`.
    ///
    /// - первые полчаса бесплатны для любой стоянки (вычитаются всегда)
    /// - стоянка не дольше бесплатного времени стоит 0, скидка не применяется
    /// - без округления, округляет только отображение
    pub fn calculate_fare(&self, ticket: &mut Ticket, apply_discount: bool) -> Result<f64, FareError> {
        let out_time = ticket.out_time.ok_or(FareError::MissingOutTime)?;
        if out_time < ticket.in_time {
            return Err(FareError::InvalidTimeRange {
                in_time: ticket.in_time,
                out_time,
            });
        }

        let category = ticket.category().ok_or(FareError::UnknownCategory)?;
        let rate = self.schedule.rate_for(category);

        let duration = (out_time - ticket.in_time).num_milliseconds() as f64 / MILLIS_PER_HOUR;

        let price = if duration <= self.schedule.free_duration_hours {
            0.0
        } else {
            let base = (duration - self.schedule.free_duration_hours) * rate;
            if apply_discount {
                base * (1.0 - self.schedule.recurring_discount)
            } else {
                base
            }
        };

        debug!(
            "fare for {}: {category} {duration:.4}h discount={apply_discount} -> {price}",
            ticket.vehicle_reg_number
        );

        ticket.price = Some(price);
        Ok(price)
    }
}

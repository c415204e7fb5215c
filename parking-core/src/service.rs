//! Жизненный цикл парковочной сессии: въезд и выезд.
//!
//! ```text
//! NoSession --въезд--> Parked --выезд (тариф посчитан)--> NoSession
//! ```
//!
//! Порядок шагов при частичных сбоях:
//! - въезд: место занимается до сохранения тикета; если тикет сохранить не
//!   удалось, место освобождается обратно
//! - выезд: место освобождается только после успешного обновления тикета;
//!   если после этого освободить место не вышло, вызывающий всё равно
//!   получает квитанцию внутри `ParkingError::SpotReleaseFailed`

use log::{info, warn};

use crate::allocator::SpotAllocator;
use crate::clock::{Clock, SystemClock};
use crate::error::{ParkingError, StoreError};
use crate::fare::FareCalculator;
use crate::input::InputSource;
use crate::store::{SpotStore, TicketStore};
use crate::types::{ParkingSpot, ParkingType, SpotId, Ticket};

/// Результат въезда
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Машина припаркована, тикет сохранён
    Parked(Ticket),
    /// Свободных мест этой категории нет; тикет не создан
    FacilityFull(ParkingType),
}

/// Результат выезда
#[derive(Debug, Clone, PartialEq)]
pub struct ExitReceipt {
    /// Закрытый тикет (out_time и price проставлены)
    pub ticket: Ticket,
    /// Итоговая цена, без округления
    pub price: f64,
    /// Применена ли скидка постоянного клиента
    pub discounted: bool,
}

/// Менеджер жизненного цикла тикетов: въезд, выезд, доступность мест.
pub struct ParkingService<T, S, C = SystemClock> {
    tickets: T,
    spots: SpotAllocator<S>,
    fares: FareCalculator,
    clock: C,
}

impl<T: TicketStore, S: SpotStore> ParkingService<T, S, SystemClock> {
    /// Сервис с системными часами
    pub fn new(tickets: T, spots: S, fares: FareCalculator) -> Self {
        Self::with_clock(tickets, spots, fares, SystemClock)
    }
}

impl<T: TicketStore, S: SpotStore, C: Clock> ParkingService<T, S, C> {
    /// Сервис с заданными часами
    pub fn with_clock(tickets: T, spots: S, fares: FareCalculator, clock: C) -> Self {
        Self {
            tickets,
            spots: SpotAllocator::new(spots),
            fares,
            clock,
        }
    }

    /// Хранилище тикетов
    pub fn ticket_store(&self) -> &T {
        &self.tickets
    }

    /// Хранилище мест
    pub fn spot_store(&self) -> &S {
        self.spots.store()
    }

    /// Тарифный калькулятор
    pub fn fares(&self) -> &FareCalculator {
        &self.fares
    }

    /// Часы сервиса
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Въезд: категория и номер из `input`, занять место, сохранить тикет.
    pub fn process_incoming_vehicle(&self, input: &mut impl InputSource) -> Result<EntryOutcome, ParkingError> {
        let category = input.read_selection()?;
        let reg = input.read_registration_number()?;

        if self.tickets.open_ticket(&reg)?.is_some() {
            return Err(ParkingError::AlreadyParked(reg));
        }

        let Some(spot) = self.spots.claim(category)? else {
            info!("parking full for {category}; {reg} turned away");
            return Ok(EntryOutcome::FacilityFull(category));
        };

        match self.issue_ticket(&reg, spot.clone()) {
            Ok(ticket) => {
                info!("{reg} parked at {category} spot {}", spot.id);
                Ok(EntryOutcome::Parked(ticket))
            }
            Err(e) => {
                self.rollback_claim(spot.id, &e);
                Err(e)
            }
        }
    }

    /// Выезд: закрыть открытый тикет, посчитать тариф, освободить место.
    pub fn process_exiting_vehicle(&self, input: &mut impl InputSource) -> Result<ExitReceipt, ParkingError> {
        let reg = input.read_registration_number()?;

        let mut ticket = self
            .tickets
            .open_ticket(&reg)?
            .ok_or_else(|| ParkingError::UnknownTicket(reg.clone()))?;

        ticket.out_time = Some(self.clock.now());

        let discounted = self.is_recurring_user(&reg, true)?;
        ticket.is_recurring_user = discounted;

        let price = self.fares.calculate_fare(&mut ticket, discounted)?;

        match self.tickets.update(&ticket) {
            Ok(()) => {}
            // параллельный выезд уже закрыл этот тикет
            Err(StoreError::TicketClosed(_)) => return Err(ParkingError::UnknownTicket(reg)),
            Err(e) => return Err(e.into()),
        }

        info!("{reg} left; ticket {} price={price:.2} discounted={discounted}", ticket.id);

        let spot_id = ticket.spot.as_ref().map(|s| s.id);
        let receipt = ExitReceipt {
            ticket,
            price,
            discounted,
        };

        let Some(spot_id) = spot_id else {
            return Ok(receipt);
        };

        match self.spots.release(spot_id) {
            Ok(()) => Ok(receipt),
            Err(source) => {
                warn!("spot {spot_id} stays unavailable after {reg} left: {source}");
                Err(ParkingError::SpotReleaseFailed {
                    receipt: Box::new(receipt),
                    spot_id,
                    source,
                })
            }
        }
    }

    /// Повторное освобождение места после `ParkingError::SpotReleaseFailed`.
    /// Только для `spot_id` из этой ошибки: за местом уже нет открытого тикета.
    pub fn release_spot(&self, spot_id: SpotId) -> Result<(), ParkingError> {
        Ok(self.spots.release(spot_id)?)
    }

    /// Свободные места категории
    pub fn available_spots(&self, category: ParkingType) -> Result<usize, ParkingError> {
        Ok(self.spots.available_count(category)?)
    }

    /// Свободные места по всем категориям
    pub fn availability(&self) -> Result<Vec<(ParkingType, usize)>, ParkingError> {
        ParkingType::ALL
            .into_iter()
            .map(|c| self.available_spots(c).map(|n| (c, n)))
            .collect()
    }

    /// Был ли номер раньше. На выезде текущий тикет сам себе историей не считается.
    fn is_recurring_user(&self, reg: &str, has_open_ticket: bool) -> Result<bool, StoreError> {
        let count = self.tickets.ticket_count(reg)?;
        let prior = if has_open_ticket {
            count.saturating_sub(1)
        } else {
            count
        };
        Ok(prior > 0)
    }

    fn issue_ticket(&self, reg: &str, spot: ParkingSpot) -> Result<Ticket, ParkingError> {
        let recurring = self.is_recurring_user(reg, false)?;
        if recurring {
            info!("returning vehicle {reg}: loyalty discount applies at exit");
        }

        let mut ticket = Ticket::open(reg, spot, self.clock.now());
        ticket.is_recurring_user = recurring;

        ticket.id = match self.tickets.save(&ticket) {
            Ok(id) => id,
            Err(StoreError::OpenTicketExists(r)) => return Err(ParkingError::AlreadyParked(r)),
            Err(e) => return Err(e.into()),
        };

        Ok(ticket)
    }

    fn rollback_claim(&self, spot_id: SpotId, cause: &ParkingError) {
        warn!("entry failed ({cause}); releasing spot {spot_id}");
        if let Err(e) = self.spots.release(spot_id) {
            warn!("failed to release spot {spot_id} after failed entry: {e}");
        }
    }
}

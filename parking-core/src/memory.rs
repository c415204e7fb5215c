//! In-memory реализации хранилищ (для CLI и тестов).

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::store::{SpotStore, TicketStore};
use crate::types::{ParkingSpot, ParkingType, SpotId, Ticket, TicketId};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(), // продолжаем, несмотря на poison
    }
}

/// Места парковки. BTreeMap => обход по возрастанию номера.
#[derive(Debug, Default)]
pub struct InMemorySpotStore {
    spots: Mutex<BTreeMap<SpotId, ParkingSpot>>,
}

impl InMemorySpotStore {
    /// Хранилище с заранее заведёнными местами
    pub fn new(spots: impl IntoIterator<Item = ParkingSpot>) -> Self {
        Self {
            spots: Mutex::new(spots.into_iter().map(|s| (s.id, s)).collect()),
        }
    }

    /// Копия всех мест, по возрастанию номера
    pub fn spots(&self) -> Vec<ParkingSpot> {
        lock(&self.spots).values().cloned().collect()
    }
}

impl SpotStore for InMemorySpotStore {
    fn next_available(&self, category: ParkingType) -> Result<Option<ParkingSpot>, StoreError> {
        let spots = lock(&self.spots);
        Ok(spots
            .values()
            .find(|s| s.category == category && s.available)
            .cloned())
    }

    fn set_availability(&self, spot_id: SpotId, available: bool) -> Result<(), StoreError> {
        let mut spots = lock(&self.spots);
        let spot = spots
            .get_mut(&spot_id)
            .ok_or(StoreError::SpotNotFound(spot_id))?;
        spot.available = available;
        Ok(())
    }

    fn compare_and_set(&self, spot_id: SpotId, expected: bool, new: bool) -> Result<bool, StoreError> {
        let mut spots = lock(&self.spots);
        let spot = spots
            .get_mut(&spot_id)
            .ok_or(StoreError::SpotNotFound(spot_id))?;
        if spot.available != expected {
            return Ok(false);
        }
        spot.available = new;
        Ok(true)
    }

    fn available_count(&self, category: ParkingType) -> Result<usize, StoreError> {
        let spots = lock(&self.spots);
        Ok(spots
            .values()
            .filter(|s| s.category == category && s.available)
            .count())
    }
}

#[derive(Debug)]
struct TicketTable {
    tickets: Vec<Ticket>,
    next_id: TicketId,
}

/// Тикеты. Счётчик id живёт под тем же замком, что и таблица.
#[derive(Debug)]
pub struct InMemoryTicketStore {
    table: Mutex<TicketTable>,
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTicketStore {
    /// Пустое хранилище, id начинаются с 1
    pub fn new() -> Self {
        Self::restore(Vec::new(), 1)
    }

    /// Восстановление из снапшота. `next_id` не опустится ниже уже выданных id.
    pub fn restore(tickets: Vec<Ticket>, next_id: TicketId) -> Self {
        let max_id = tickets.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            table: Mutex::new(TicketTable {
                tickets,
                next_id: next_id.max(max_id + 1),
            }),
        }
    }

    /// Копия всех тикетов в порядке сохранения
    pub fn tickets(&self) -> Vec<Ticket> {
        lock(&self.table).tickets.clone()
    }

    /// id, который получит следующий тикет
    pub fn next_id(&self) -> TicketId {
        lock(&self.table).next_id
    }
}

impl TicketStore for InMemoryTicketStore {
    fn save(&self, ticket: &Ticket) -> Result<TicketId, StoreError> {
        let mut table = lock(&self.table);

        let reg = ticket.vehicle_reg_number.as_str();
        if ticket.is_open()
            && table
                .tickets
                .iter()
                .any(|t| t.is_open() && t.vehicle_reg_number == reg)
        {
            return Err(StoreError::OpenTicketExists(reg.to_string()));
        }

        let id = table.next_id;
        table.next_id += 1;

        let mut stored = ticket.clone();
        stored.id = id;
        table.tickets.push(stored);
        Ok(id)
    }

    fn update(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut table = lock(&self.table);
        let stored = table
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket.id)
            .ok_or(StoreError::TicketNotFound(ticket.id))?;

        if !stored.is_open() {
            return Err(StoreError::TicketClosed(ticket.id));
        }

        stored.out_time = ticket.out_time;
        stored.price = ticket.price;
        stored.is_recurring_user = ticket.is_recurring_user;
        Ok(())
    }

    fn open_ticket(&self, vehicle_reg_number: &str) -> Result<Option<Ticket>, StoreError> {
        let table = lock(&self.table);
        Ok(table
            .tickets
            .iter()
            .rev()
            .find(|t| t.is_open() && t.vehicle_reg_number == vehicle_reg_number)
            .cloned())
    }

    fn ticket_count(&self, vehicle_reg_number: &str) -> Result<usize, StoreError> {
        let table = lock(&self.table);
        Ok(table
            .tickets
            .iter()
            .filter(|t| t.vehicle_reg_number == vehicle_reg_number)
            .count())
    }
}

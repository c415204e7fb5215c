//! Контракты хранилищ, которыми пользуется ядро.
//!
//! Реализации обязаны быть потокобезопасными: все методы берут `&self`,
//! сервис шарится между потоками через `Arc`.

use crate::error::StoreError;
use crate::types::{ParkingSpot, ParkingType, SpotId, Ticket, TicketId};

/// Хранилище тикетов
pub trait TicketStore: Send + Sync {
    /// Сохраняет новый тикет и возвращает присвоенный id.
    /// Второй открытый тикет на тот же номер — `StoreError::OpenTicketExists`.
    fn save(&self, ticket: &Ticket) -> Result<TicketId, StoreError>;

    /// Обновляет out_time/price/признак постоянного клиента.
    /// Закрытый тикет повторно не закрывается — `StoreError::TicketClosed`.
    fn update(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Открытый тикет машины, если есть
    fn open_ticket(&self, vehicle_reg_number: &str) -> Result<Option<Ticket>, StoreError>;

    /// Сколько всего тикетов было у машины (открытые и закрытые)
    fn ticket_count(&self, vehicle_reg_number: &str) -> Result<usize, StoreError>;
}

/// Хранилище парковочных мест
pub trait SpotStore: Send + Sync {
    /// Свободное место категории с наименьшим номером
    fn next_available(&self, category: ParkingType) -> Result<Option<ParkingSpot>, StoreError>;

    /// Безусловно выставляет доступность места
    fn set_availability(&self, spot_id: SpotId, available: bool) -> Result<(), StoreError>;

    /// CAS: меняет доступность на `new`, только если сейчас она `expected`.
    /// Возвращает `false`, если значение уже другое.
    fn compare_and_set(&self, spot_id: SpotId, expected: bool, new: bool) -> Result<bool, StoreError>;

    /// Число свободных мест категории
    fn available_count(&self, category: ParkingType) -> Result<usize, StoreError>;
}

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::memory::{InMemorySpotStore, InMemoryTicketStore};
use crate::types::{ParkingSpot, Ticket, TicketId};

/// Текущая версия формата снапшота
pub const SNAPSHOT_VERSION: u8 = 1;

/// Состояние in-memory хранилищ: места, тикеты и следующий id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySnapshot {
    /// Все места
    pub spots: Vec<ParkingSpot>,
    /// Все тикеты, в порядке сохранения
    pub tickets: Vec<Ticket>,
    /// Следующий id тикета
    pub next_ticket_id: TicketId,
}

impl FacilitySnapshot {
    /// Снимок текущего состояния хранилищ
    pub fn capture(spots: &InMemorySpotStore, tickets: &InMemoryTicketStore) -> Self {
        Self {
            spots: spots.spots(),
            tickets: tickets.tickets(),
            next_ticket_id: tickets.next_id(),
        }
    }

    /// Обратно в хранилища
    pub fn into_stores(self) -> (InMemorySpotStore, InMemoryTicketStore) {
        (
            InMemorySpotStore::new(self.spots),
            InMemoryTicketStore::restore(self.tickets, self.next_ticket_id),
        )
    }
}

/// Версия + postcard payload
pub fn encode_v1(snapshot: &FacilitySnapshot) -> Result<Vec<u8>, SnapshotError> {
    let mut out = vec![SNAPSHOT_VERSION];
    out.extend_from_slice(&postcard::to_allocvec(snapshot)?);
    Ok(out)
}

/// Проверяет версию и разбирает payload
pub fn decode(buf: &[u8]) -> Result<FacilitySnapshot, SnapshotError> {
    let (&ver, payload) = buf.split_first().ok_or(SnapshotError::TooShort)?;
    if ver != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(ver));
    }
    Ok(postcard::from_bytes(payload)?)
}

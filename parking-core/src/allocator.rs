use log::{debug, info};

use crate::constants::CLAIM_RETRY_LIMIT;
use crate::error::StoreError;
use crate::store::SpotStore;
use crate::types::{ParkingSpot, ParkingType, SpotId};

/// Выдача и освобождение парковочных мест поверх `SpotStore`.
#[derive(Debug)]
pub struct SpotAllocator<S> {
    store: S,
}

impl<S: SpotStore> SpotAllocator<S> {
    /// Аллокатор поверх хранилища мест
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Хранилище под аллокатором
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Свободное место с наименьшим номером, только чтение.
    /// `None` — парковка для этой категории заполнена.
    pub fn next_available_spot(&self, category: ParkingType) -> Result<Option<ParkingSpot>, StoreError> {
        self.store.next_available(category)
    }

    /// Записывает доступность места; ошибки хранилища возвращаются вызывающему
    pub fn update_spot_availability(&self, spot_id: SpotId, available: bool) -> Result<(), StoreError> {
        self.store.set_availability(spot_id, available)
    }

    /// Атомарно выбирает и занимает место.
    ///
    /// Выбор и пометка "занято" разделены, поэтому пометка идёт через CAS:
    /// если место успел забрать другой поток, берём следующего кандидата.
    pub fn claim(&self, category: ParkingType) -> Result<Option<ParkingSpot>, StoreError> {
        for attempt in 0..CLAIM_RETRY_LIMIT {
            let Some(mut spot) = self.store.next_available(category)? else {
                return Ok(None);
            };

            if self.store.compare_and_set(spot.id, true, false)? {
                spot.available = false;
                info!("claimed {category} spot {}", spot.id);
                return Ok(Some(spot));
            }

            debug!("lost race for {category} spot {} (attempt {attempt})", spot.id);
        }

        Err(StoreError::Contention(category))
    }

    /// Освобождает место
    pub fn release(&self, spot_id: SpotId) -> Result<(), StoreError> {
        self.store.set_availability(spot_id, true)?;
        info!("released spot {spot_id}");
        Ok(())
    }

    /// Число свободных мест категории
    pub fn available_count(&self, category: ParkingType) -> Result<usize, StoreError> {
        self.store.available_count(category)
    }
}

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use log::info;
use parking_core::memory::{InMemorySpotStore, InMemoryTicketStore};
use parking_core::wire::{FacilitySnapshot, decode, encode_v1};

/// Снапшот из файла; `None`, если файла ещё нет
pub(crate) fn load(path: &Path) -> anyhow::Result<Option<FacilitySnapshot>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read state file {:?}", path)),
    };

    let snapshot = decode(&bytes).with_context(|| format!("decode state file {:?}", path))?;
    info!(
        "loaded state from {:?}: {} spots, {} tickets",
        path,
        snapshot.spots.len(),
        snapshot.tickets.len()
    );
    Ok(Some(snapshot))
}

/// Пишет снапшот через временный файл + rename
pub(crate) fn save(
    path: &Path,
    spots: &InMemorySpotStore,
    tickets: &InMemoryTicketStore,
) -> anyhow::Result<()> {
    let bytes = encode_v1(&FacilitySnapshot::capture(spots, tickets)).context("encode state")?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).with_context(|| format!("write {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_core::store::SpotStore;
    use parking_core::{ParkingSpot, ParkingType};

    #[test]
    fn missing_file_means_fresh_start() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("state.bin")).unwrap().is_none());
    }

    #[test]
    fn save_then_load_restores_stores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.bin");

        let spots = InMemorySpotStore::new([
            ParkingSpot::new(1, ParkingType::Car, true),
            ParkingSpot::new(2, ParkingType::Bike, true),
        ]);
        spots.set_availability(2, false).unwrap();
        save(&path, &spots, &InMemoryTicketStore::new()).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let (spots, tickets) = load(&path).unwrap().unwrap().into_stores();
        assert_eq!(spots.available_count(ParkingType::Bike).unwrap(), 0);
        assert_eq!(spots.available_count(ParkingType::Car).unwrap(), 1);
        assert_eq!(tickets.next_id(), 1);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.bin");
        fs::write(&path, b"\x07garbage").unwrap();
        assert!(load(&path).is_err());
    }
}

//! Интерактивное меню: въезд, выезд, выключение.

use std::io::Write;

use log::warn;
use parking_core::clock::Clock;
use parking_core::store::{SpotStore, TicketStore};
use parking_core::{EntryOutcome, ExitReceipt, InputError, ParkingError, ParkingService};
use thiserror::Error;

use crate::console::ConsoleInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuOption {
    Incoming,
    Exiting,
    Shutdown,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum MenuError {
    #[error("empty option")]
    Empty,

    #[error("unsupported option: {0}")]
    Unsupported(String),
}

/// Парсит пункт меню: "1" | "2" | "3"
pub(crate) fn parse_menu_option(line: &str) -> Result<MenuOption, MenuError> {
    match line.trim() {
        "" => Err(MenuError::Empty),
        "1" => Ok(MenuOption::Incoming),
        "2" => Ok(MenuOption::Exiting),
        "3" => Ok(MenuOption::Shutdown),
        other => Err(MenuError::Unsupported(other.to_string())),
    }
}

const MENU: &str = "\
Please select an option. Simply enter the number to proceed.
1 New Vehicle Entering - Allocate Parking Space
2 Vehicle Exiting - Generate Ticket Price
3 Shutdown System";

/// Цикл меню до "3", EOF или Ctrl+C.
/// `persist` вызывается после каждого успешного въезда/выезда.
pub(crate) fn run_menu<T, S, C, W>(
    svc: &ParkingService<T, S, C>,
    console: &mut ConsoleInput<W>,
    mut persist: impl FnMut() -> anyhow::Result<()>,
) -> anyhow::Result<()>
where
    T: TicketStore,
    S: SpotStore,
    C: Clock,
    W: Write,
{
    console.say("Welcome to Parking System!")?;

    loop {
        console.say(MENU)?;

        let line = match console.read_line() {
            Ok(l) => l,
            Err(InputError::Closed) => break,
            Err(e) => return Err(e.into()),
        };

        let option = match parse_menu_option(&line) {
            Ok(o) => o,
            Err(e) => {
                console.say(format!(
                    "{e}. Please enter a number corresponding to the provided menu"
                ))?;
                continue;
            }
        };

        let changed = match option {
            MenuOption::Incoming => incoming(svc, console)?,
            MenuOption::Exiting => exiting(svc, console)?,
            MenuOption::Shutdown => {
                console.say("Exiting from the system!")?;
                break;
            }
        };

        if changed {
            persist()?;
        }
    }

    Ok(())
}

fn incoming<T, S, C, W>(svc: &ParkingService<T, S, C>, console: &mut ConsoleInput<W>) -> anyhow::Result<bool>
where
    T: TicketStore,
    S: SpotStore,
    C: Clock,
    W: Write,
{
    match svc.process_incoming_vehicle(console) {
        Ok(EntryOutcome::Parked(ticket)) => {
            if ticket.is_recurring_user {
                let pct = svc.fares().schedule().recurring_discount * 100.0;
                console.say(format!(
                    "Welcome back! As a recurring user of our parking lot, you'll benefit from a {pct:.0}% discount."
                ))?;
            }
            console.say(format!("Generated Ticket and saved in DB: {ticket}"))?;
            if let Some(spot) = &ticket.spot {
                console.say(format!("Please park your vehicle in spot number:{}", spot.id))?;
            }
            console.say(format!(
                "Recorded in-time for vehicle number:{} is:{}",
                ticket.vehicle_reg_number,
                ticket.in_time.format("%Y-%m-%d %H:%M:%S")
            ))?;
            Ok(true)
        }
        Ok(EntryOutcome::FacilityFull(category)) => {
            console.say(format!(
                "Parking slots are full for {category}. Please come back later"
            ))?;
            Ok(false)
        }
        Err(e) => report(console, "Unable to process incoming vehicle", e),
    }
}

fn exiting<T, S, C, W>(svc: &ParkingService<T, S, C>, console: &mut ConsoleInput<W>) -> anyhow::Result<bool>
where
    T: TicketStore,
    S: SpotStore,
    C: Clock,
    W: Write,
{
    match svc.process_exiting_vehicle(console) {
        Ok(receipt) => {
            print_receipt(console, &receipt)?;
            Ok(true)
        }
        // тикет уже закрыт и оплачен: показываем тариф и пробуем ещё раз
        Err(ParkingError::SpotReleaseFailed { receipt, spot_id, .. }) => {
            print_receipt(console, &receipt)?;
            if let Err(e) = svc.release_spot(spot_id) {
                warn!("spot {spot_id} is still marked unavailable: {e}");
            }
            Ok(true)
        }
        Err(e) => report(console, "Unable to update ticket information", e),
    }
}

fn print_receipt<W: Write>(console: &mut ConsoleInput<W>, receipt: &ExitReceipt) -> anyhow::Result<()> {
    console.say(format!("Please pay the parking fare:{:.2}", receipt.price))?;
    if let Some(out) = receipt.ticket.out_time {
        console.say(format!(
            "Recorded out-time for vehicle number:{} is:{}",
            receipt.ticket.vehicle_reg_number,
            out.format("%Y-%m-%d %H:%M:%S")
        ))?;
    }
    Ok(())
}

/// Доменная ошибка => сообщение пользователю, цикл продолжается.
/// Закрытый ввод и ошибки вывода поднимаются наверх.
fn report<W: Write>(console: &mut ConsoleInput<W>, what: &str, e: ParkingError) -> anyhow::Result<bool> {
    match e {
        ParkingError::Input(InputError::Closed | InputError::Io(_)) => Err(e.into()),
        other => {
            warn!("{what}: {other}");
            console.say(format!("{what}: {other}"))?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_core::FareCalculator;
    use parking_core::clock::ManualClock;
    use parking_core::memory::{InMemorySpotStore, InMemoryTicketStore};
    use parking_core::{ParkingSpot, ParkingType, SpotId, StoreError};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    type Svc = ParkingService<InMemoryTicketStore, InMemorySpotStore, ManualClock>;

    fn svc() -> Svc {
        ParkingService::with_clock(
            InMemoryTicketStore::new(),
            InMemorySpotStore::new([
                ParkingSpot::new(1, ParkingType::Car, true),
                ParkingSpot::new(2, ParkingType::Bike, true),
            ]),
            FareCalculator::default(),
            ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()),
        )
    }

    fn console(lines: &[&str]) -> ConsoleInput<Vec<u8>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        for l in lines {
            tx.send(l.to_string()).unwrap();
        }
        drop(tx);
        ConsoleInput::new(rx, Vec::new(), Arc::new(AtomicBool::new(false)))
    }

    fn run(svc: &Svc, lines: &[&str]) -> (String, usize) {
        let mut c = console(lines);
        let mut saves = 0;
        run_menu(svc, &mut c, || {
            saves += 1;
            Ok(())
        })
        .unwrap();
        (String::from_utf8_lossy(c.output()).to_string(), saves)
    }

    #[test]
    fn parse_menu_option_maps_numbers() {
        assert_eq!(parse_menu_option(" 1\n"), Ok(MenuOption::Incoming));
        assert_eq!(parse_menu_option("2"), Ok(MenuOption::Exiting));
        assert_eq!(parse_menu_option("3"), Ok(MenuOption::Shutdown));
        assert_eq!(parse_menu_option("  "), Err(MenuError::Empty));
        assert_eq!(
            parse_menu_option("4"),
            Err(MenuError::Unsupported("4".into()))
        );
    }

    #[test]
    fn entry_then_shutdown() {
        let svc = svc();
        let (out, saves) = run(&svc, &["1", "1", "ABCDEF", "3"]);

        assert!(out.starts_with("Welcome to Parking System!\n"));
        assert!(out.contains(
            "Generated Ticket and saved in DB: ticket=1 vehicle=ABCDEF spot=CAR#1 in=2025-01-01 08:00:00"
        ));
        assert!(out.contains("Please park your vehicle in spot number:1"));
        assert!(out.contains("Recorded in-time for vehicle number:ABCDEF is:2025-01-01 08:00:00"));
        assert!(out.ends_with("Exiting from the system!\n"));
        assert_eq!(saves, 1);
        assert_eq!(svc.available_spots(ParkingType::Car).unwrap(), 0);
    }

    #[test]
    fn exit_prints_rounded_fare() {
        let svc = svc();
        let (_, _) = run(&svc, &["1", "1", "ABCDEF"]);
        svc.clock().advance(Duration::minutes(100));

        let (out, saves) = run(&svc, &["2", "ABCDEF"]);
        // (100/60 - 0.5) * 1.5 = 1.75
        assert!(out.contains("Please pay the parking fare:1.75"));
        assert!(out.contains("Recorded out-time for vehicle number:ABCDEF is:2025-01-01 09:40:00"));
        assert_eq!(saves, 1);
    }

    /// Первые `failures` попыток выставить доступность падают
    struct FlakySpots {
        inner: InMemorySpotStore,
        failures: AtomicUsize,
    }

    impl SpotStore for FlakySpots {
        fn next_available(&self, category: ParkingType) -> Result<Option<ParkingSpot>, StoreError> {
            self.inner.next_available(category)
        }
        fn set_availability(&self, spot_id: SpotId, available: bool) -> Result<(), StoreError> {
            let left = self.failures.load(Ordering::Relaxed);
            if left > 0 {
                self.failures.store(left - 1, Ordering::Relaxed);
                return Err(StoreError::Backend("spots down".into()));
            }
            self.inner.set_availability(spot_id, available)
        }
        fn compare_and_set(&self, spot_id: SpotId, expected: bool, new: bool) -> Result<bool, StoreError> {
            self.inner.compare_and_set(spot_id, expected, new)
        }
        fn available_count(&self, category: ParkingType) -> Result<usize, StoreError> {
            self.inner.available_count(category)
        }
    }

    #[test]
    fn exit_shows_fare_even_if_spot_release_fails_once() {
        let svc = ParkingService::with_clock(
            InMemoryTicketStore::new(),
            FlakySpots {
                inner: InMemorySpotStore::new([ParkingSpot::new(1, ParkingType::Car, true)]),
                failures: AtomicUsize::new(0),
            },
            FareCalculator::default(),
            ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()),
        );
        run_menu(&svc, &mut console(&["1", "1", "ABCDEF"]), || Ok(())).unwrap();
        svc.clock().advance(Duration::hours(2));
        svc.spot_store().failures.store(1, Ordering::Relaxed);

        let mut c = console(&["2", "ABCDEF"]);
        let mut saves = 0;
        run_menu(&svc, &mut c, || {
            saves += 1;
            Ok(())
        })
        .unwrap();
        let out = String::from_utf8_lossy(c.output()).to_string();

        // (2 - 0.5) * 1.5 = 2.25
        assert!(out.contains("Please pay the parking fare:2.25"));
        assert!(!out.contains("Unable to update ticket information"));
        assert_eq!(saves, 1);
        assert_eq!(svc.available_spots(ParkingType::Car).unwrap(), 1);
    }

    #[test]
    fn full_facility_and_bad_options_do_not_persist() {
        let svc = svc();
        let (out, saves) = run(&svc, &["x", "1", "2", "M1", "1", "2", "M2", "2", "NOPE"]);

        assert!(out.contains("unsupported option: x"));
        assert!(out.contains("Parking slots are full for BIKE"));
        assert!(out.contains("Unable to update ticket information: no open ticket for vehicle NOPE"));
        assert_eq!(saves, 1);
    }

    #[test]
    fn returning_user_is_welcomed_back() {
        let svc = svc();
        run(&svc, &["1", "2", "M1", "2", "M1"]);
        let (out, _) = run(&svc, &["1", "2", "M1"]);
        assert!(out.contains("you'll benefit from a 5% discount"));
    }

    #[test]
    fn invalid_vehicle_type_is_reported() {
        let svc = svc();
        let (out, saves) = run(&svc, &["1", "7", "3"]);
        assert!(out.contains("Unable to process incoming vehicle: unknown vehicle type selection"));
        assert_eq!(saves, 0);
    }

    #[test]
    fn eof_in_the_middle_of_entry_ends_loop_with_error() {
        let svc = svc();
        let mut c = console(&["1", "1"]);
        let res = run_menu(&svc, &mut c, || Ok(()));
        assert!(res.is_err());
        assert_eq!(svc.available_spots(ParkingType::Car).unwrap(), 1);
    }
}

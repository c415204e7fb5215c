//! Точка входа `parking-cli`.
//!
//! Жизненный цикл:
//! - парсинг CLI, загрузка схемы парковки или файла состояния
//! - чтение stdin в отдельном потоке
//! - интерактивное меню въезда/выезда
//! - сохранение состояния после каждой операции (если задан --state-file)
//! - корректная остановка по `Ctrl+C`, EOF или пункту меню 3

mod cli;
mod config;
mod console;
mod layout;
mod menu;
mod state;

use std::io;
use std::sync::{Arc, atomic::AtomicBool, atomic::Ordering};

use anyhow::Context;
use clap::Parser;
use log::info;
use parking_core::memory::{InMemorySpotStore, InMemoryTicketStore};
use parking_core::{FareCalculator, ParkingService};

fn main() -> anyhow::Result<()> {
    // Логи через RUST_LOG=info/trace
    env_logger::init();

    let shutdown = Arc::new(AtomicBool::new(false));

    // Ctrl+C => ставим shutdown=true
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
            info!("shutting down...");
        })?;
    }

    let args = cli::Args::parse();
    args.validate()?;

    let restored = match &args.state_file {
        Some(path) => state::load(path)?,
        None => None,
    };

    let (spots, tickets) = match restored {
        Some(snapshot) => {
            if args.layout.is_some() || args.layout_file.is_some() {
                info!("state file present; layout arguments ignored");
            }
            snapshot.into_stores()
        }
        None => {
            let spots = layout::load_spots(&args).context("load parking layout")?;
            (InMemorySpotStore::new(spots), InMemoryTicketStore::new())
        }
    };

    let fares = FareCalculator::new(args.fare_schedule()).context("fare schedule")?;
    let svc = ParkingService::new(tickets, spots, fares);

    let free = svc
        .availability()?
        .iter()
        .map(|(c, n)| format!("{c}={n}"))
        .collect::<Vec<_>>()
        .join(",");
    info!(
        "Starting parking-cli: free={}, car_rate={}, bike_rate={}, state_file={:?}",
        free, args.car_rate, args.bike_rate, args.state_file
    );

    let lines = console::spawn_line_reader(io::BufReader::new(io::stdin()));
    let mut console = console::ConsoleInput::new(lines, io::stdout(), shutdown);

    menu::run_menu(&svc, &mut console, || match &args.state_file {
        Some(path) => state::save(path, svc.spot_store(), svc.ticket_store()),
        None => Ok(()),
    })?;

    Ok(())
}

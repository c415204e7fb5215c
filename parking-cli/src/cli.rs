use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};
use parking_core::FareSchedule;

use crate::config;

/// Parking System - въезд/выезд, выдача мест и расчёт тарифа из консоли.
///
/// Схема парковки берётся из --layout-file, --layout или встроенной
/// (3 места CAR, 2 места BIKE).
#[derive(Parser, Debug, Clone)]
#[command(name = "parking-cli", version, about)]
#[command(
    group(
        ArgGroup::new("layout_source")
            .required(false)
            .multiple(false)
            .args(["layout_file", "layout"])
    )
)]
pub(crate) struct Args {
    /// Файл схемы: по строке `CATEGORY COUNT`, поддержка # комментариев
    #[arg(long, conflicts_with = "layout")]
    pub(crate) layout_file: Option<PathBuf>,

    /// Схема строкой, например: "CAR:3,BIKE:2"
    #[arg(long, conflicts_with = "layout_file")]
    pub(crate) layout: Option<String>,

    /// Тариф CAR за час
    #[arg(long, default_value_t = config::CAR_RATE_PER_HOUR)]
    pub(crate) car_rate: f64,

    /// Тариф BIKE за час
    #[arg(long, default_value_t = config::BIKE_RATE_PER_HOUR)]
    pub(crate) bike_rate: f64,

    /// Файл состояния: читается при старте (если есть), пишется после каждого въезда/выезда
    #[arg(long)]
    pub(crate) state_file: Option<PathBuf>,
}

impl Args {
    /// Валидация аргументов (тарифы, файл схемы существует и т.д.)
    pub(crate) fn validate(&self) -> Result<()> {
        for (name, rate) in [("--car-rate", self.car_rate), ("--bike-rate", self.bike_rate)] {
            if !rate.is_finite() || rate < 0.0 {
                bail!("{name} must be a non-negative number (got: {rate})");
            }
        }

        if let Some(path) = &self.layout_file {
            let md = std::fs::metadata(path)
                .with_context(|| format!("layout file not found: {:?}", path))?;
            if !md.is_file() {
                bail!("--layout-file must point to a file: {:?}", path);
            }
        }

        if let Some(path) = &self.state_file {
            if path.is_dir() {
                bail!("--state-file must point to a file: {:?}", path);
            }
        }

        Ok(())
    }

    pub(crate) fn fare_schedule(&self) -> FareSchedule {
        FareSchedule {
            car_rate_per_hour: self.car_rate,
            bike_rate_per_hour: self.bike_rate,
            ..FareSchedule::default()
        }
    }
}

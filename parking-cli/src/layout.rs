use std::path::{Path, PathBuf};

use parking_core::layout::{build_spots, parse_layout_csv, read_layout, read_layout_from_path};
use parking_core::{LayoutError, ParkingSpot};
use thiserror::Error;

use crate::cli::Args;
use crate::config::DEFAULT_LAYOUT;

#[derive(Debug, Error)]
pub(crate) enum LayoutSourceError {
    #[error("invalid layout file {path:?}")]
    File {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },

    #[error("invalid --layout value {raw:?}")]
    Arg {
        raw: String,
        #[source]
        source: LayoutError,
    },

    #[error("invalid built-in layout")]
    BuiltIn(#[source] LayoutError),
}

pub(crate) type Result<T> = std::result::Result<T, LayoutSourceError>;

/// Места парковки из источника, выбранного в CLI:
/// - `--layout-file` -> parking_core::layout::read_layout_from_path
/// - `--layout`      -> parking_core::layout::parse_layout_csv
/// - ничего          -> встроенная схема assets/layout.txt
pub(crate) fn load_spots(args: &Args) -> Result<Vec<ParkingSpot>> {
    if let Some(path) = &args.layout_file {
        load_from_file(path)
    } else if let Some(raw) = &args.layout {
        load_from_arg(raw)
    } else {
        load_built_in()
    }
}

fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<ParkingSpot>> {
    let path = path.as_ref().to_path_buf();
    read_layout_from_path(&path)
        .and_then(|layout| build_spots(&layout))
        .map_err(|source| LayoutSourceError::File { path, source })
}

fn load_from_arg(raw: &str) -> Result<Vec<ParkingSpot>> {
    parse_layout_csv(raw)
        .and_then(|layout| build_spots(&layout))
        .map_err(|source| LayoutSourceError::Arg {
            raw: raw.to_string(),
            source,
        })
}

fn load_built_in() -> Result<Vec<ParkingSpot>> {
    read_layout(DEFAULT_LAYOUT.as_bytes())
        .and_then(|layout| build_spots(&layout))
        .map_err(LayoutSourceError::BuiltIn)
}

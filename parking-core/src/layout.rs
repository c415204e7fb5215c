use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::LayoutError;
use crate::types::{ParkingSpot, ParkingType, SpotId};

/// Строка схемы: сколько мест данной категории
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Категория мест
    pub category: ParkingType,
    /// Количество мест
    pub count: u32,
}

/// Чтение схемы парковки: по строке `CATEGORY COUNT`, `#` — комментарий
pub fn read_layout<R: io::Read>(reader: R) -> Result<Vec<LayoutEntry>, LayoutError> {
    let mut out = Vec::new();
    let buf = BufReader::new(reader);

    for (idx, line) in buf.lines().enumerate() {
        let line = line?;
        let Some(s) = normalize_line(&line) else {
            continue;
        };

        let mut parts = s.split_whitespace();
        let (Some(category), Some(count), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(LayoutError::Malformed {
                line: idx + 1,
                raw: line.clone(),
            });
        };
        out.push(parse_entry(category, count, idx + 1, &line)?);
    }

    Ok(out)
}

/// Чтение схемы из файла
pub fn read_layout_from_path(path: impl AsRef<Path>) -> Result<Vec<LayoutEntry>, LayoutError> {
    let f = File::open(path)?;
    read_layout(f)
}

/// Парсит схему из строки вида "CAR:3, BIKE:2".
/// Пустые элементы игнорируются.
pub fn parse_layout_csv(raw: &str) -> Result<Vec<LayoutEntry>, LayoutError> {
    let mut out = Vec::new();

    for (idx, part) in raw.split(',').enumerate() {
        let p = part.trim();
        if p.is_empty() {
            continue;
        }
        let Some((category, count)) = p.split_once(':') else {
            return Err(LayoutError::Malformed {
                line: idx + 1,
                raw: p.to_string(),
            });
        };
        out.push(parse_entry(category, count, idx + 1, p)?);
    }

    Ok(out)
}

/// Разворачивает схему в места с номерами 1.., в порядке записей
pub fn build_spots(layout: &[LayoutEntry]) -> Result<Vec<ParkingSpot>, LayoutError> {
    let mut spots = Vec::new();
    let mut next_id: SpotId = 1;

    for entry in layout {
        for _ in 0..entry.count {
            spots.push(ParkingSpot::new(next_id, entry.category, true));
            next_id += 1;
        }
    }

    if spots.is_empty() {
        return Err(LayoutError::Empty);
    }
    Ok(spots)
}

fn parse_entry(category: &str, count: &str, line: usize, raw: &str) -> Result<LayoutEntry, LayoutError> {
    let category: ParkingType = category
        .parse()
        .map_err(|_| LayoutError::UnknownCategory(category.trim().to_string()))?;
    let count: u32 = count.trim().parse().map_err(|_| LayoutError::Malformed {
        line,
        raw: raw.to_string(),
    })?;
    Ok(LayoutEntry { category, count })
}

fn normalize_line(line: &str) -> Option<&str> {
    // Поддержка inline-комментариев: "CAR 3 # north wing"
    let s = line.split('#').next().unwrap_or("").trim();
    if s.is_empty() {
        return None;
    }
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn entry(category: ParkingType, count: u32) -> LayoutEntry {
        LayoutEntry { category, count }
    }

    #[test]
    fn normalize_line_ignores_empty_and_comments() {
        assert_eq!(normalize_line(""), None);
        assert_eq!(normalize_line("   "), None);
        assert_eq!(normalize_line("# comment"), None);
        assert_eq!(normalize_line("  #"), None);
        assert_eq!(normalize_line("car 3 # north"), Some("car 3"));
        assert_eq!(normalize_line("  BIKE 2#x"), Some("BIKE 2"));
    }

    #[test]
    fn read_layout_parses_entries_in_order() {
        let input = "\
# facility
CAR 3
  bike 2   # rear
";
        let got = read_layout(Cursor::new(input)).unwrap();
        assert_eq!(got, vec![entry(ParkingType::Car, 3), entry(ParkingType::Bike, 2)]);
    }

    #[test]
    fn read_layout_reports_line_of_malformed_entry() {
        let input = "CAR 3\nBIKE\n";
        let err = read_layout(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LayoutError::Malformed { line: 2, .. }));

        let err = read_layout(Cursor::new("CAR three\n")).unwrap_err();
        assert!(matches!(err, LayoutError::Malformed { line: 1, .. }));

        let err = read_layout(Cursor::new("CAR 1 2\n")).unwrap_err();
        assert!(matches!(err, LayoutError::Malformed { line: 1, .. }));
    }

    #[test]
    fn read_layout_rejects_unknown_category() {
        let err = read_layout(Cursor::new("TRUCK 1\n")).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownCategory(c) if c == "TRUCK"));
    }

    #[test]
    fn parse_layout_csv_skips_empty_parts() {
        let got = parse_layout_csv(" car:2, ,BIKE: 1 ,").unwrap();
        assert_eq!(got, vec![entry(ParkingType::Car, 2), entry(ParkingType::Bike, 1)]);
        assert!(parse_layout_csv("").unwrap().is_empty());
        assert!(parse_layout_csv("CAR=2").is_err());
    }

    #[test]
    fn build_spots_numbers_consecutively() {
        let spots = build_spots(&[entry(ParkingType::Car, 2), entry(ParkingType::Bike, 1)]).unwrap();
        assert_eq!(
            spots,
            vec![
                ParkingSpot::new(1, ParkingType::Car, true),
                ParkingSpot::new(2, ParkingType::Car, true),
                ParkingSpot::new(3, ParkingType::Bike, true),
            ]
        );
    }

    #[test]
    fn build_spots_rejects_empty_layout() {
        assert!(matches!(build_spots(&[]), Err(LayoutError::Empty)));
        assert!(matches!(
            build_spots(&[entry(ParkingType::Car, 0)]),
            Err(LayoutError::Empty)
        ));
    }

    #[test]
    fn read_layout_from_path_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "CAR 1\nBIKE 4").unwrap();

        let got = read_layout_from_path(f.path()).unwrap();
        assert_eq!(got, vec![entry(ParkingType::Car, 1), entry(ParkingType::Bike, 4)]);
    }

    #[test]
    fn read_layout_from_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_layout_from_path(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, LayoutError::Io(_)));
    }
}

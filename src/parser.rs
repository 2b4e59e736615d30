use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::division::Participant;
use crate::form::parse_priority;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to open crew roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed crew roster: {0}")]
    Csv(#[from] csv::Error),
}

/// Finds a column by (case-insensitive) header keyword
fn find_column(headers: &csv::StringRecord, keyword: &str, fallback: usize) -> usize {
    headers
        .iter()
        .position(|h| h.to_lowercase().contains(keyword))
        .unwrap_or(fallback)
}

/// Reads a crew roster from CSV.
///
/// The first row is a header. The name column is the first header mentioning
/// "name" (column 0 otherwise), the priority column the first mentioning
/// "priority" (column 1 otherwise). Priorities go through the same clamping
/// as the crew editor, so "-2" or "high" become 0.
pub fn read_crew<R: Read>(reader: R) -> Result<Vec<Participant>, ImportError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let name_col = find_column(&headers, "name", 0);
    let priority_col = find_column(&headers, "priority", 1);

    let mut crew = Vec::new();
    for result in reader.records() {
        let record = result?;

        // Skip rows that carry nothing at all
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        let priority = parse_priority(record.get(priority_col).unwrap_or(""));
        crew.push(Participant::new(name, priority));
    }

    Ok(crew)
}

/// Loads a crew roster from a CSV file
pub fn load_crew<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Participant>, ImportError> {
    let file = File::open(csv_path)?;
    read_crew(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_columns_in_any_order() {
        let data = "Priority,Pirate Name\n1,Anne\n2,Mary\n";
        let crew = read_crew(data.as_bytes()).unwrap();
        assert_eq!(crew, vec![Participant::new("Anne", 1), Participant::new("Mary", 2)]);
    }

    #[test]
    fn falls_back_to_positional_columns() {
        let data = "who,rank\nJack,3\n";
        let crew = read_crew(data.as_bytes()).unwrap();
        assert_eq!(crew, vec![Participant::new("Jack", 3)]);
    }

    #[test]
    fn bad_priorities_clamp_to_zero() {
        let data = "name,priority\nAnne,-2\nMary,high\nJack,\n";
        let crew = read_crew(data.as_bytes()).unwrap();
        assert!(crew.iter().all(|p| p.priority == 0));
        assert_eq!(crew.len(), 3);
    }

    #[test]
    fn blank_rows_are_skipped_and_short_rows_kept() {
        let data = "name,priority\n , \nAnne\n,4\n";
        let crew = read_crew(data.as_bytes()).unwrap();
        assert_eq!(crew, vec![Participant::new("Anne", 0), Participant::new("", 4)]);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crew.csv");
        std::fs::write(&path, "name,priority\nAnne,1\n").unwrap();

        let crew = load_crew(&path).unwrap();
        assert_eq!(crew, vec![Participant::new("Anne", 1)]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_crew(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}

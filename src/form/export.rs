use crate::division::AllocationResult;
use std::io::Write;
use std::path::Path;
use std::fs::File;
use csv::WriterBuilder;

const HEADER: [&str; 4] = ["pirate", "gems", "gold", "diamonds"];

/// Writes a distribution as CSV: one header row, then one row per pirate in
/// crew order
pub fn write_results_csv<W: Write>(
    writer: W,
    results: &[AllocationResult],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for result in results {
        wtr.write_record(&[
            result.pirate_name.clone(),
            result.gems_received.to_string(),
            result.gold_received.to_string(),
            result.diamonds_received.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a distribution to a CSV file, replacing any previous export
pub fn export_results_to_csv(
    csv_path: &Path,
    results: &[AllocationResult],
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(csv_path)?;
    write_results_csv(file, results)
}

/// Renders a distribution into an in-memory CSV document
pub fn results_to_csv_string(results: &[AllocationResult]) -> Result<String, Box<dyn std::error::Error>> {
    let mut buf = Vec::new();
    write_results_csv(&mut buf, results)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<AllocationResult> {
        vec![
            AllocationResult {
                pirate_name: "Anne, the Bold".to_string(),
                gems_received: 67,
                gold_received: 2,
                diamonds_received: 0,
            },
            AllocationResult::empty_handed("Mary"),
        ]
    }

    #[test]
    fn csv_has_header_and_quoted_names() {
        let csv = results_to_csv_string(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "pirate,gems,gold,diamonds");
        assert_eq!(lines[1], "\"Anne, the Bold\",67,2,0");
        assert_eq!(lines[2], "Mary,0,0,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_distribution_is_header_only() {
        let csv = results_to_csv_string(&[]).unwrap();
        assert_eq!(csv, "pirate,gems,gold,diamonds\n");
    }

    #[test]
    fn export_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "stale\n").unwrap();

        export_results_to_csv(&path, &sample()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("pirate,gems,gold,diamonds\n"));
        assert!(!content.contains("stale"));
    }
}

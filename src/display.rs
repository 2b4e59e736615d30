use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::division::{drift, AllocationResult, ResourceDrift, ResourcePool};

/// Formats one pirate's haul: "Anne: 67 gems, 0 gold, 0 diamonds"
pub fn format_share(result: &AllocationResult) -> String {
    format!(
        "{}: {} gems, {} gold, {} diamonds",
        result.pirate_name, result.gems_received, result.gold_received, result.diamonds_received
    )
}

/// Formats rounding drift as "gems +1, gold 0, diamonds -1"
pub fn format_drift(d: &ResourceDrift) -> String {
    fn signed(v: i64) -> String {
        if v > 0 { format!("+{}", v) } else { v.to_string() }
    }
    format!(
        "gems {}, gold {}, diamonds {}",
        signed(d.gems),
        signed(d.gold),
        signed(d.diamonds)
    )
}

/// Writes a distribution to a text file in the format: name: N gems, N gold, N diamonds
pub fn write_distribution_to_file(
    path: &Path,
    pool: &ResourcePool,
    results: &[AllocationResult],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;

    writeln!(file, "** Distribution Matrix **")?;
    writeln!(
        file,
        "Vault: {} gems, {} gold, {} diamonds",
        pool.gems, pool.gold, pool.diamonds
    )?;

    if results.is_empty() {
        writeln!(file, "[NO ELIGIBLE CREW]")?;
        return Ok(());
    }

    for result in results {
        writeln!(file, "{}", format_share(result))?;
    }
    writeln!(file, "Rounding drift: {}", format_drift(&drift(pool, results)))?;

    Ok(())
}

/// Renders a distribution the way the terminal shows it
pub fn render_distribution<W: Write>(
    out: &mut W,
    pool: &ResourcePool,
    results: &[AllocationResult],
) -> std::io::Result<()> {
    writeln!(out, "\n=== Distribution Matrix ===")?;
    writeln!(
        out,
        "Vault: {} gems, {} gold, {} diamonds",
        pool.gems, pool.gold, pool.diamonds
    )?;

    if results.is_empty() {
        writeln!(out, "⚠️  Nobody on the crew has a priority above 0, nothing was divided.")?;
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        writeln!(out, "  {:>3}. {}", i + 1, format_share(result))?;
    }

    let d = drift(pool, results);
    if !d.is_exact() {
        writeln!(out, "\nRounding drift: {}", format_drift(&d))?;
    }
    Ok(())
}

/// Prints a distribution in a readable format
pub fn print_distribution(pool: &ResourcePool, results: &[AllocationResult]) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_distribution(&mut out, pool, results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::division::{allocate, Participant};

    #[test]
    fn drift_signs() {
        let d = ResourceDrift { gems: 1, gold: 0, diamonds: -2 };
        assert_eq!(format_drift(&d), "gems +1, gold 0, diamonds -2");
    }

    #[test]
    fn report_lists_every_pirate_and_drift() {
        let pool = ResourcePool::new(100, 10, 0);
        let crew = vec![Participant::new("A", 1), Participant::new("B", 2), Participant::new("C", 0)];
        let results = allocate(&pool, &crew);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_distribution_to_file(&path, &pool, &results).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "** Distribution Matrix **");
        assert_eq!(lines[2], "A: 67 gems, 7 gold, 0 diamonds");
        assert_eq!(lines[3], "B: 33 gems, 3 gold, 0 diamonds");
        assert_eq!(lines[4], "C: 0 gems, 0 gold, 0 diamonds");
        assert_eq!(lines[5], "Rounding drift: gems 0, gold 0, diamonds 0");
    }

    #[test]
    fn report_for_empty_distribution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_distribution_to_file(&path, &ResourcePool::new(5, 0, 0), &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[NO ELIGIBLE CREW]"));
    }

    fn rendered(pool: &ResourcePool, results: &[AllocationResult]) -> String {
        let mut out = Vec::new();
        render_distribution(&mut out, pool, results).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn terminal_shows_notice_for_empty_distribution() {
        let text = rendered(&ResourcePool::new(10, 0, 0), &[]);
        assert!(text.contains("Vault: 10 gems, 0 gold, 0 diamonds"));
        assert!(text.contains("nothing was divided"));
        assert!(!text.contains("  1. "));
    }

    #[test]
    fn terminal_numbers_shares_and_reports_drift() {
        let pool = ResourcePool::new(10, 0, 0);
        let crew = vec![Participant::new("A", 1), Participant::new("B", 1), Participant::new("C", 1)];
        let text = rendered(&pool, &allocate(&pool, &crew));
        assert!(text.contains("    1. A: 3 gems, 0 gold, 0 diamonds"));
        assert!(text.contains("    3. C: 3 gems, 0 gold, 0 diamonds"));
        assert!(text.contains("Rounding drift: gems -1, gold 0, diamonds 0"));
    }

    #[test]
    fn terminal_omits_drift_when_exact() {
        let pool = ResourcePool::new(9, 0, 0);
        let crew = vec![Participant::new("A", 1), Participant::new("B", 2)];
        let text = rendered(&pool, &allocate(&pool, &crew));
        assert!(!text.contains("Rounding drift"));
    }
}

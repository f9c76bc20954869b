use std::path::Path;

use anyhow::{Context, Result};
use lotostat_core::models::Combination;

pub fn format_combination(position: usize, combination: &Combination) -> String {
    let numbers = combination
        .numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" - ");
    format!(
        "Grille {} : {} | Probabilité : {:.2}%",
        position,
        numbers,
        combination.probability * 100.0
    )
}

pub fn format_export(combinations: &[Combination]) -> String {
    combinations
        .iter()
        .enumerate()
        .map(|(i, c)| format_combination(i + 1, c))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_export(path: &Path, combinations: &[Combination]) -> Result<()> {
    let mut content = format_export(combinations);
    content.push('\n');
    std::fs::write(path, content).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    log::info!("{} grilles exportées vers {:?}", combinations.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_combination() {
        let c = Combination::new(vec![38, 5, 14, 23, 41, 57], 42, 0.4567);
        assert_eq!(
            format_combination(1, &c),
            "Grille 1 : 5 - 14 - 23 - 38 - 41 - 57 | Probabilité : 45.67%"
        );
    }

    #[test]
    fn test_format_export_numbers_lines() {
        let combos = vec![
            Combination::new(vec![1, 2, 3], 0, 0.5),
            Combination::new(vec![4, 5, 6], 0, 0.25),
        ];
        let text = format_export(&combos);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Grille 2 : 4 - 5 - 6"));
        assert!(lines[1].ends_with("25.00%"));
    }
}

//! Importance summary table

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::FeatureAnalysis;

/// Terminal summary of a feature analysis
#[derive(Debug)]
pub struct ImportanceSummary<'a> {
    analysis: &'a FeatureAnalysis,
}

impl<'a> ImportanceSummary<'a> {
    pub fn new(analysis: &'a FeatureAnalysis) -> Self {
        Self { analysis }
    }

    /// Build the table of features ranked by importance
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Feature").add_attribute(Attribute::Bold),
            Cell::new("Isolated R²").add_attribute(Attribute::Bold),
            Cell::new("Importance").add_attribute(Attribute::Bold),
            Cell::new("Target Corr").add_attribute(Attribute::Bold),
        ]);

        for entry in self.analysis.importance.ranked() {
            let corr = self
                .analysis
                .target_correlations
                .iter()
                .find(|(name, _)| name == &entry.feature)
                .map(|(_, c)| format!("{:+.4}", c))
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                Cell::new(&entry.feature),
                Cell::new(format!("{:.4}", entry.isolated_r_squared))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", entry.importance))
                    .fg(importance_color(entry.importance))
                    .set_alignment(CellAlignment::Right),
                Cell::new(corr).set_alignment(CellAlignment::Right),
            ]);
        }

        table
    }

    /// Render the full summary as plain text
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Target: {}  Full R²: {:.4}\n",
            self.analysis.target, self.analysis.importance.full_r_squared
        ));
        out.push_str(&self.table().to_string());
        if !self.analysis.dropped.is_empty() {
            out.push_str(&format!(
                "\nDropped as redundant ({}): {}",
                self.analysis.dropped.len(),
                self.analysis.dropped.join(", ")
            ));
        }
        out
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("Σ").cyan(),
            style("FEATURE IMPORTANCE").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!(
            "      Target: {}   Full R²: {}",
            style(&self.analysis.target).cyan(),
            style(format!("{:.4}", self.analysis.importance.full_r_squared))
                .green()
                .bold()
        );
        println!();

        // Indent the table
        for line in self.table().to_string().lines() {
            println!("    {}", line);
        }

        if !self.analysis.dropped.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Dropped as redundant").yellow(),
                style(format!("({})", self.analysis.dropped.len())).dim()
            );
            for feature in &self.analysis.dropped {
                println!("        {} {}", style("•").dim(), feature);
            }
        }
    }
}

fn importance_color(importance: f64) -> Color {
    if importance > 0.1 {
        Color::Green
    } else if importance > 0.01 {
        Color::Yellow
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ImportanceVector;

    fn analysis() -> FeatureAnalysis {
        FeatureAnalysis {
            target: "y".to_string(),
            dropped: vec!["x2".to_string()],
            importance: ImportanceVector::new(
                0.9,
                vec!["a".to_string(), "b".to_string()],
                vec![0.8, 0.2],
            ),
            target_correlations: vec![("a".to_string(), 0.3), ("b".to_string(), -0.7)],
        }
    }

    #[test]
    fn test_render_ranks_features() {
        let analysis = analysis();
        let text = ImportanceSummary::new(&analysis).render();

        let pos_a = text.find("│ a").unwrap();
        let pos_b = text.find("│ b").unwrap();
        assert!(pos_b < pos_a, "b is more important and should be listed first");
        assert!(text.contains("-0.7000"));
        assert!(text.contains("Dropped as redundant (1): x2"));
    }
}

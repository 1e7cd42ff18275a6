use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use monocrack::BreakOutcome;

pub fn print_summary(outcome: &BreakOutcome) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    let avg_ms = if outcome.generations > 0 {
        outcome.elapsed.as_secs_f64() * 1000.0 / outcome.generations as f64
    } else {
        0.0
    };

    table.add_row(vec![
        Cell::new("Generations"),
        Cell::new(outcome.generations).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Elapsed (sec)"),
        Cell::new(format!("{:.3}", outcome.elapsed.as_secs_f64()))
            .set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Avg ms/gen"),
        Cell::new(format!("{:.2}", avg_ms)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Best fitness"),
        Cell::new(format!("{:.4}", outcome.best_fitness)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Best key"),
        Cell::new(&outcome.best_key_text),
    ]);

    println!("{table}");
}

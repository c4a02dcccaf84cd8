use std::fs::File;
use std::io::Write;
use crate::error::Result;
use crate::export::TimetableExport;
use crate::schedule::Timetable;

/// Renders the live roster as a table: one row per time slot, one column per
/// day, seat names joined by ", " with `x` for an empty seat.
pub fn render_roster(timetable: &Timetable) -> String {
    render_export(&TimetableExport::from_timetable(timetable))
}

pub fn render_export(export: &TimetableExport) -> String {
    let mut table: Vec<Vec<String>> = Vec::with_capacity(export.rows.len() + 1);

    let mut header = vec![String::new()];
    header.extend(export.columns.iter().cloned());
    table.push(header);

    for slot in &export.rows {
        let mut row = vec![slot.clone()];
        for day in &export.columns {
            row.push(export.names(slot, day).join(", "));
        }
        table.push(row);
    }

    let columns = export.columns.len() + 1;
    let widths: Vec<usize> = (0..columns)
        .map(|c| table.iter().map(|row| row[c].chars().count()).max().unwrap_or(0))
        .collect();
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");

    let mut out = String::new();
    for (i, row) in table.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
        if i == 0 {
            out.push_str(&rule);
            out.push('\n');
        }
    }
    out
}

/// Prints the roster followed by its score line
pub fn print_roster(export: &TimetableExport) {
    println!("\n=== Roster ===");
    print!("{}", render_export(export));
    println!(
        "Score: {} (best {}) after {} evaluations",
        export.score,
        export.best.map_or_else(|| "-".to_string(), |best| best.to_string()),
        export.evaluations
    );
}

/// Writes the rendered table to a file
pub fn write_roster_to_file(export: &TimetableExport, filename: &str) -> Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "** Roster, score {} **", export.score)?;
    write!(file, "{}", render_export(export))?;
    Ok(())
}

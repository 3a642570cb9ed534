use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::signals::SignalDates;

use super::styling::{heading, muted};
use super::tables::{color_coded_days_cell, create_table, cyan_header};

/// Prints a human-readable summary of collected signal days to stdout.
pub fn print_summary(dates: &SignalDates, since: &str) {
    println!("{}", render_summary(dates, since));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{emoji} {}", heading(title));
}

/// Renders the overview and the per-month breakdown.
///
/// Month rows are color coded: green for no days, yellow for up to a week,
/// red beyond that.
pub fn render_summary(dates: &SignalDates, since: &str) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "🌶️", "Overview");
    let overlap = dates
        .bug_days
        .iter()
        .filter(|day| dates.failure_days.contains(day))
        .count();

    let mut overview = create_table();
    overview.set_header(cyan_header(&["Metric", "Value"]));
    overview.add_row(vec!["Window start".to_string(), since.to_string()]);
    overview.add_row(vec![
        Cell::new("Bug days").fg(TableColor::Red),
        Cell::new(dates.bug_days.len()),
    ]);
    overview.add_row(vec![
        Cell::new("Failure days").fg(TableColor::Yellow),
        Cell::new(dates.failure_days.len()),
    ]);
    overview.add_row(vec!["Days with both".to_string(), overlap.to_string()]);
    let _ = writeln!(output, "{overview}\n");

    add_section_header(&mut output, "📅", "Monthly Breakdown");
    let rows = dates.monthly_breakdown();
    if rows.is_empty() {
        let _ = writeln!(output, "  {}", muted("No signals in the window"));
        return output;
    }

    let mut monthly = create_table();
    monthly.set_header(cyan_header(&["Month", "Bug days", "Failure days"]));
    for (month, bugs, failures) in rows {
        monthly.add_row(vec![
            Cell::new(month),
            color_coded_days_cell(bugs),
            color_coded_days_cell(failures),
        ]);
    }
    let _ = writeln!(output, "{monthly}");

    output
}

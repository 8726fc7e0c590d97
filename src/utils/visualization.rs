//! Visualization utilities (text-based for terminal output)

use crate::history::TrendSeries;

/// Print a simple ASCII bar chart of per-cluster counts
pub fn print_bar_chart(labels: &[String], values: &[usize], width: usize, title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    let max_val = values.iter().copied().max().unwrap_or(0);
    let label_width = labels.iter().map(|s| s.len()).max().unwrap_or(10);

    for (label, &value) in labels.iter().zip(values.iter()) {
        let bar_len = if max_val > 0 { value * width / max_val } else { 0 };
        println!(
            "{:>label_width$} | {:<width$} {}",
            label,
            "#".repeat(bar_len),
            value,
            label_width = label_width,
            width = width
        );
    }
}

/// Print the per-cluster trend as a table, one row per recorded run
pub fn print_trend_table(trend: &TrendSeries) {
    print!("{:>19}", "time");
    for cluster in 0..trend.series.len() {
        print!(" {:>9}", format!("cluster {}", cluster));
    }
    println!();

    for (i, timestamp) in trend.timestamps.iter().enumerate() {
        let time = timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        print!("{:>19}", time);
        for series in &trend.series {
            print!(" {:>9}", series.get(i).copied().unwrap_or(0));
        }
        println!();
    }
}

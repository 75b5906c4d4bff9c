//! Progress reporting and visualization for CLI

use std::path::Path;

use anyhow::Result;
use commentprep_core::PipelineStats;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress reporter with a main bar and a running stats line
pub struct ProgressReporter {
    _multi: MultiProgress,
    main_bar: ProgressBar,
    stats_bar: ProgressBar,
    mode: ProgressMode,
}

/// Progress tracking mode
enum ProgressMode {
    /// Track progress by bytes read
    Bytes,
    /// Track progress by records enriched
    Records,
}

impl ProgressReporter {
    /// Create a reporter for the reading phase, tracking bytes
    pub fn new(total_bytes: u64) -> Result<Self> {
        Self::with_template(
            total_bytes,
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
            ProgressMode::Bytes,
        )
    }

    /// Create a reporter for the enrichment phase, tracking records
    pub fn new_record_based(total_records: u64) -> Result<Self> {
        Self::with_template(
            total_records,
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {human_pos}/{human_len} ({per_sec}) {msg}",
            ProgressMode::Records,
        )
    }

    fn with_template(len: u64, template: &str, mode: ProgressMode) -> Result<Self> {
        let multi = MultiProgress::new();

        let main_bar = multi.add(ProgressBar::new(len));
        main_bar.set_style(
            ProgressStyle::default_bar()
                .template(template)?
                .progress_chars("█▓▒░-"),
        );

        let stats_bar = multi.add(ProgressBar::new(0));
        stats_bar.set_style(ProgressStyle::default_bar().template("Stats: {msg}")?);

        Ok(Self {
            _multi: multi,
            main_bar,
            stats_bar,
            mode,
        })
    }

    /// Update progress while reading
    pub fn update_read(&self, bytes: u64, records: usize) {
        if let ProgressMode::Bytes = self.mode {
            self.main_bar.set_position(bytes);
        } else {
            self.main_bar.set_position(records as u64);
        }
        self.main_bar.set_message("Reading...");
        self.stats_bar
            .set_message(format!("{} records", Self::format_number(records)));
    }

    /// Update progress while enriching
    pub fn update_enrich(&self, stats: &PipelineStats) {
        self.main_bar.set_position(stats.total_records as u64);
        self.main_bar.set_message("Enriching...");

        let total = stats.total_records;
        let stats_msg = if total > 0 {
            format!(
                "{} total | {} target language ({:.1}%) | {} with products ({:.1}%)",
                Self::format_number(total),
                Self::format_number(stats.target_language_records),
                stats.target_language_rate(),
                Self::format_number(stats.records_with_products),
                stats.product_rate()
            )
        } else {
            "0 total".to_string()
        };

        self.stats_bar.set_message(stats_msg);
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        self.main_bar.finish_with_message("Complete!");
        self.stats_bar.finish();
    }

    /// Format large numbers with a K/M suffix
    fn format_number(n: usize) -> String {
        if n >= 1_000_000 {
            format!("{:.1}M", n as f64 / 1_000_000.0)
        } else if n >= 1_000 {
            format!("{:.1}K", n as f64 / 1_000.0)
        } else {
            n.to_string()
        }
    }
}

/// Print a formatted summary report
pub fn print_summary_report(
    input: &Path,
    output: Option<&Path>,
    target_language: &str,
    stats: &PipelineStats,
) {
    let total = stats.total_records;

    println!("\n{}", "═".repeat(60));
    println!("Comment Enrichment Complete");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());

    if let Some(output_path) = output {
        println!("Output:             {}", output_path.display());
    } else {
        println!("Output:             (dry run - no output written)");
    }

    println!("Total records:      {}", format_with_commas(total));
    println!(
        "Target language:    {} {} ({:.1}%)",
        target_language,
        format_with_commas(stats.target_language_records),
        stats.target_language_rate()
    );
    println!(
        "Unknown language:   {} ({:.1}%)",
        format_with_commas(stats.languages.unknown),
        stats.languages.unknown_rate() * 100.0
    );
    if stats.languages.errors > 0 {
        println!(
            "Detection errors:   {}",
            format_with_commas(stats.languages.errors)
        );
    }
    println!(
        "Mention products:   {} ({:.1}%)",
        format_with_commas(stats.records_with_products),
        stats.product_rate()
    );

    if !stats.product_mentions.is_empty() {
        println!("{}", "─".repeat(60));
        for (product, count) in &stats.product_mentions {
            println!("  {:<18}{}", product, format_with_commas(*count));
        }
    }

    let languages = stats.languages.top_languages();
    if !languages.is_empty() {
        println!("{}", "─".repeat(60));
        for (code, count) in languages.iter().take(5) {
            println!("  {:<18}{}", code, format_with_commas(*count));
        }
    }

    println!("{}", "═".repeat(60));
}

/// Format number with thousand separators
fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(ProgressReporter::format_number(42), "42");
        assert_eq!(ProgressReporter::format_number(1_234), "1.2K");
        assert_eq!(ProgressReporter::format_number(1_234_567), "1.2M");
    }

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(42), "42");
        assert_eq!(format_with_commas(1234), "1,234");
        assert_eq!(format_with_commas(123456), "123,456");
        assert_eq!(format_with_commas(1234567), "1,234,567");
    }
}

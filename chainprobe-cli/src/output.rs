//! Terminal output formatting.

use colored::Colorize;

use chainprobe_verifier::{ArchiveSummary, BlockCheck};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".cyan(), msg);
}

/// Print a warning message.
pub fn warn(msg: &str) {
    println!("{} {}", "!".yellow().bold(), msg.yellow());
}

/// Print a header.
pub fn header(msg: &str) {
    println!("\n{}", msg.white().bold());
    println!("{}", "─".repeat(msg.chars().count()).dimmed());
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    println!("  {} {}", format!("{}:", key).dimmed(), value);
}

/// One line per checked block.
fn block_line(check: &BlockCheck) {
    let line = format!(
        "#{:<12} range {:>4} logs  hash {:>4} logs  {:>4} txs  bloom {}/{}",
        check.block_number,
        check.by_range.logs_count,
        check.by_hash.logs_count,
        check.by_range.tx_hashes_count,
        check.bloom_coverage.in_bloom,
        check.bloom_coverage.logs_count,
    );
    if check.is_consistent() {
        success(&line);
    } else {
        error(&line);
        for err in check.by_range.errors.iter().chain(&check.by_hash.errors) {
            eprintln!("    {}", err.dimmed());
        }
        for reason in [&check.by_range.reason, &check.by_hash.reason].into_iter().flatten() {
            eprintln!("    {}", reason.dimmed());
        }
    }
}

/// Print the result of an archive run.
pub fn archive_summary(summary: &ArchiveSummary) {
    header(&format!("Archive sampling (tip #{})", summary.tip));
    for check in &summary.checks {
        block_line(check);
    }
    for height in &summary.skipped {
        warn(&format!("#{} skipped (fetch failed)", height));
    }

    println!();
    kv("Sampled", &summary.visited.len().to_string());
    kv("Consistent", &summary.consistent().to_string());
    kv("Inconsistent", &summary.inconsistent().to_string());
    kv("Skipped", &summary.skipped.len().to_string());
    println!();
}

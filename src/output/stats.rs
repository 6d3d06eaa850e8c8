//! Statistics reporting.

use console::style;

use crate::download::RunSummary;

/// Print the end-of-run statistics block.
pub fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Statistics:").bold());
    println!("  Pages in catalog:    {}", summary.catalog_size);
    println!(
        "  Assets found:        {} ({} from cache)",
        summary.extracted, summary.from_cache
    );
    println!("  No video on page:    {}", summary.extraction_misses);
    if summary.extraction_failures > 0 {
        println!(
            "  Pages failed:        {}",
            style(summary.extraction_failures).red()
        );
    }
    println!(
        "  Skipped:             {} (already downloaded)",
        summary.already_downloaded
    );
    if summary.duplicate_assets > 0 {
        println!(
            "  Duplicates:          {} (same video on another page)",
            summary.duplicate_assets
        );
    }
    println!(
        "  Downloaded:          {} ({})",
        style(summary.downloaded).green(),
        indicatif::HumanBytes(summary.bytes_downloaded)
    );
    if !summary.download_failures.is_empty() {
        println!(
            "  Downloads failed:    {}",
            style(summary.download_failures.len()).red()
        );
        for failure in &summary.download_failures {
            println!(
                "    {} {}: {}",
                style(failure.id).dim(),
                failure.title,
                failure.reason
            );
        }
    }
    println!(
        "  Total:               {} succeeded, {} failed",
        summary.successes(),
        summary.failures()
    );
    println!("{}", style("═".repeat(50)).dim());
}

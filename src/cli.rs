//! Command-line interface definitions and argument parsing

use clap::Parser;

use crate::rules::Metric;

/// Market basket analysis CLI using Apriori association rule mining
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file (semicolon-separated boolean columns)
    #[arg(short, long, default_value = "market_data.csv")]
    pub input: String,

    /// Minimum support for frequent itemsets, in (0, 1]
    #[arg(short = 's', long, default_value = "0.02")]
    pub min_support: f64,

    /// Metric used to filter candidate rules
    #[arg(short, long, value_enum, default_value = "lift")]
    pub metric: Metric,

    /// Minimum value of the chosen metric for a rule to be kept
    #[arg(short = 't', long, default_value = "1.0")]
    pub min_threshold: f64,

    /// Number of top-ranked rules to include in the graph visualization
    #[arg(short = 'n', long, default_value = "5")]
    pub top_n: usize,

    /// Output path for the rule graph image
    #[arg(short, long, default_value = "association_rules.png")]
    pub output: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validate parameter ranges before the pipeline runs
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            anyhow::bail!(
                "min_support must be in (0, 1], got {}",
                self.min_support
            );
        }

        if !self.min_threshold.is_finite() {
            anyhow::bail!("min_threshold must be a finite number");
        }

        if self.top_n == 0 {
            anyhow::bail!("top_n must be at least 1");
        }

        Ok(())
    }
}

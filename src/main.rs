//! BasketForge: Market basket analysis CLI using Apriori association rule mining
//!
//! This is the main entrypoint that orchestrates data loading, itemset mining,
//! rule generation, ranking, and graph visualization.

use anyhow::Result;
use basketforge::{
    generate_rules, load_transactions, mine_frequent_itemsets, project_rules, rank_rules, viz,
    Args,
};
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    // Parse and validate command-line arguments
    let args = Args::parse();
    args.validate()?;

    if args.verbose {
        println!("BasketForge - Association Rule Mining");
        println!("=====================================\n");
    }

    run_pipeline(&args)
}

/// Run the full mining pipeline: load -> mine -> generate -> rank -> visualize
fn run_pipeline(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load the transaction matrix
    if args.verbose {
        println!("Step 1: Loading transaction data");
        println!("  Input file: {}", args.input);
    }

    let data_start = Instant::now();
    let matrix = load_transactions(&args.input)?;
    let data_time = data_start.elapsed();

    println!(
        "✓ Data loaded: {} transactions x {} items",
        matrix.n_transactions(),
        matrix.n_items()
    );
    if args.verbose {
        println!("  Loading time: {:.2}s", data_time.as_secs_f64());
    }

    // Step 2: Mine frequent itemsets
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets");
        println!("  Minimum support: {}", args.min_support);
    }

    let mine_start = Instant::now();
    let frequent = mine_frequent_itemsets(&matrix, args.min_support)?;
    let mine_time = mine_start.elapsed();

    println!(
        "✓ Mining complete: {} frequent itemsets (largest has {} items)",
        frequent.len(),
        frequent.max_size()
    );
    if args.verbose {
        println!("  Mining time: {:.2}s", mine_time.as_secs_f64());
    }

    // Step 3: Generate and rank rules
    if args.verbose {
        println!("\nStep 3: Generating association rules");
        println!("  Filter metric: {:?} >= {}", args.metric, args.min_threshold);
    }

    let rules_start = Instant::now();
    let rules = generate_rules(&frequent, args.metric, args.min_threshold)?;
    let ranked = rank_rules(rules);
    let rules_time = rules_start.elapsed();

    if ranked.is_empty() {
        // Soft outcome, not a failure: thresholds were simply too strict
        println!(
            "\nNo association rules found with the given parameters; \
             try lowering --min-support or --min-threshold."
        );
        return Ok(());
    }

    println!("✓ {} rules generated", ranked.len());
    if args.verbose {
        println!("  Rule generation time: {:.2}s", rules_time.as_secs_f64());
    }

    viz::print_rule_summary(&ranked, &matrix, args.top_n);

    // Step 4: Project the top rules and render the graph
    if args.verbose {
        println!("\nStep 4: Rendering rule graph");
        println!("  Output file: {}", args.output);
    }

    let viz_start = Instant::now();
    let edges = project_rules(&ranked, args.top_n, &matrix);
    viz::render_rule_graph(&edges, &args.output)?;
    let viz_time = viz_start.elapsed();

    if args.verbose {
        println!("  Visualization time: {:.2}s", viz_time.as_secs_f64());
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());
    println!("Rule graph saved to: {}", args.output);

    Ok(())
}

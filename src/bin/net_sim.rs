//! 排队网络仿真
//!
//! 读取网络描述（或使用内置示例网络），以给定种子执行多次独立仿真并输出汇总。

use clap::Parser;
use qnet_sim::demo::{DEFAULT_SPAWN_LIMIT, build_three_node, build_two_node};
use qnet_sim::export;
use qnet_sim::net::{Net, NetSpec};
use qnet_sim::rng::DEFAULT_SEED;
use qnet_sim::runner::Runner;
use qnet_sim::sim::EndCriteria;
use qnet_sim::stats::{AggregateResult, DEFAULT_CONFIDENCE, Stat};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "net-sim", about = "Run independent simulations of a queueing network")]
struct Args {
    /// Path to the network description (JSON)
    #[arg(long, conflicts_with = "demo")]
    net: Option<PathBuf>,

    /// Built-in network: two-node or three-node
    #[arg(long)]
    demo: Option<String>,

    /// Arrivals generated by the source of a built-in network
    #[arg(long, default_value_t = DEFAULT_SPAWN_LIMIT)]
    limit: u64,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of independent runs (at least 2)
    #[arg(long, default_value_t = 10)]
    runs: usize,

    /// End criteria, e.g. "MaxArrivals:Queue,1000;MaxTime:5000"
    #[arg(long)]
    end: Option<String>,

    /// Execute runs on a worker pool
    #[arg(long)]
    parallel: bool,

    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Write per-run records to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the aggregate as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn load_net(args: &Args) -> Result<Net, Box<dyn Error>> {
    if let Some(path) = &args.net {
        let raw = fs::read_to_string(path)?;
        let spec = NetSpec::from_json(&raw)?;
        return Ok(Net::from_spec(&spec)?);
    }
    match args.demo.as_deref().unwrap_or("two-node") {
        "two-node" => Ok(build_two_node(args.limit)?),
        "three-node" => Ok(build_three_node(args.limit)?),
        other => Err(format!("unknown demo network '{other}'").into()),
    }
}

fn print_table(agg: &AggregateResult) {
    println!(
        "runs={} confidence={} time={:.3} ± {:.3}",
        agg.runs, agg.confidence, agg.average.time, agg.error.time
    );
    for node in &agg.average.nodes {
        println!("[{}]", node.name);
        for stat in Stat::ALL {
            let mean = stat.get(&node.stats);
            let err = agg
                .error
                .node(&node.name)
                .map_or(0.0, |s| stat.get(s));
            println!("  {:<18} {:>14.4} ± {:.4}", stat.name(), mean, err);
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let criteria = match &args.end {
        Some(text) => EndCriteria::parse_all(text)?,
        None => Vec::new(),
    };
    if args.runs < 2 {
        return Err(format!("--runs must be at least 2, got {}", args.runs).into());
    }
    let runner = Runner::new(load_net(args)?).with_confidence(args.confidence);

    let results = runner.run_results(args.seed, args.runs, &criteria, args.parallel)?;
    if let Some(path) = &args.csv {
        fs::write(path, export::to_csv(&results)?)?;
    }
    let agg = AggregateResult::from_runs(&results, args.confidence)?;
    let wall_clock: Duration = results.iter().map(|r| r.elapsed).sum();
    info!(runs = agg.runs, wall_clock_ms = wall_clock.as_millis() as u64, "汇总完成");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&agg)?);
    } else {
        print_table(&agg);
    }
    Ok(())
}

fn main() -> ExitCode {
    // 初始化 tracing（日志写到 stderr，stdout 只留结果）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

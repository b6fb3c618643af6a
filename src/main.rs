use anyhow::Context;
use clap::{ArgGroup, Parser, ValueEnum};
use dsi_progress_logger::ProgressLogger;
use log::info;
use partitioned_centralities::betweenness::BrandesKernel;
use partitioned_centralities::closeness::DijkstraClosenessKernel;
use partitioned_centralities::coordinator::Coordinator;
use partitioned_centralities::graph::{edge_list, EdgeListFormat, GraphStore};
use partitioned_centralities::kernel::{CentralityKernel, CentralityResult};
use partitioned_centralities::output;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Auto,
    Whitespace,
    Comma,
}

#[derive(Parser, Debug)]
#[command(about = "Computes betweenness and closeness centralities", long_about = None)]
#[command(group(ArgGroup::new("centralities").required(true).multiple(true)))]
struct MainArgs {
    /// Edge list, one edge per line
    #[arg(short = 'p', long)]
    path: PathBuf,

    #[arg(short = 'f', long, value_enum, default_value = "auto")]
    format: Format,

    /// The first line of a comma-separated edge list is a header
    #[arg(long)]
    header: bool,

    /// Number of workers; 0 uses one per core
    #[arg(short = 'w', long, default_value = "0")]
    workers: usize,

    /// Threads of each worker; 0 splits the cores among workers
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Write the results under <graph>_results in the current directory
    #[arg(short = 's', long)]
    save: bool,

    #[arg(long, group = "centralities")]
    betweenness: bool,

    #[arg(long)]
    normalized: bool,

    #[arg(long, group = "centralities")]
    closeness: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;

    let args = MainArgs::parse();
    info!("Args: {:?}", args);

    let format = match args.format {
        Format::Auto if args.header => Some(EdgeListFormat::Comma { header: true }),
        Format::Auto => None,
        Format::Whitespace => Some(EdgeListFormat::Whitespace),
        Format::Comma => Some(EdgeListFormat::Comma {
            header: args.header,
        }),
    };

    let results_dir = if args.save {
        let graph_name = args
            .path
            .file_stem()
            .with_context(|| format!("No file name in {}", args.path.display()))?
            .to_string_lossy();
        let results_dir = env::current_dir()?.join(format!("{graph_name}_results"));
        std::fs::create_dir_all(&results_dir)
            .with_context(|| format!("Cannot create {}", results_dir.display()))?;
        Some(results_dir)
    } else {
        None
    };

    let start = Instant::now();
    let graph = Arc::new(
        edge_list::load(&args.path, format)
            .with_context(|| format!("Failed loading {}", args.path.display()))?,
    );
    let coordinator = Coordinator::new(args.workers, args.threads);

    if args.betweenness {
        let kernel = BrandesKernel {
            normalized: args.normalized,
        };
        let res = run(&coordinator, &kernel, &graph)?;
        emit(&res, results_dir.as_deref(), "betweenness.txt")?;
    }

    if args.closeness {
        let res = run(&coordinator, &DijkstraClosenessKernel, &graph)?;
        emit(&res, results_dir.as_deref(), "closeness.txt")?;
    }

    info!("Elapsed time: {}", hms(start.elapsed()));
    info!("Done");

    Ok(())
}

fn run(
    coordinator: &Coordinator,
    kernel: &impl CentralityKernel,
    graph: &Arc<GraphStore>,
) -> anyhow::Result<CentralityResult> {
    info!(
        "-------------- Computing {} --------------",
        kernel.centrality().name().to_lowercase()
    );
    let start = Instant::now();
    let res = coordinator.run_on(kernel, Arc::clone(graph), &mut ProgressLogger::default())?;
    info!("Computed in {}", hms(start.elapsed()));
    Ok(res)
}

fn emit(res: &CentralityResult, results_dir: Option<&Path>, filename: &str) -> anyhow::Result<()> {
    match results_dir {
        Some(dir) => output::save(res, dir.join(filename))
            .with_context(|| format!("Failed writing {filename}"))?,
        None => output::write_results(res, std::io::stdout().lock())?,
    }
    Ok(())
}

fn hms(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

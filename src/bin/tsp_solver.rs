use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use ::log::{LevelFilter, error, info, warn};
use anyhow::Context;
use serde::Serialize;
use structopt::StructOpt;
use tsp_bnb::{log::build_logger_for_verbosity, prelude::*};

#[derive(Debug, StructOpt)]
#[structopt(about = "Solves travelling salesman instances by branch and bound")]
struct Opts {
    /// Instance file, or directory whose files are all solved
    #[structopt(parse(from_os_str))]
    path: PathBuf,

    /// Time limit per instance in seconds
    #[structopt(short = "T", long, default_value = "900")]
    timeout: f64,

    /// Limit on the memory held by pending search nodes, in MiB
    #[structopt(short, long)]
    memory_limit: Option<usize>,

    /// Print one JSON object per instance
    #[structopt(long)]
    json: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    instance: &'a str,
    #[serde(flatten)]
    solution: &'a Solution,
}

fn list_instances(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = path.join("*");
    let pattern = pattern
        .to_str()
        .context("Instance directory is not valid UTF-8")?;

    let mut files: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn solve_instance(path: &Path, config: SolverConfig) -> anyhow::Result<Solution> {
    let matrix = CostMatrix::try_read_matrix_file(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Ok(solve_with_config(matrix, config)?)
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);

    let time_limit = Duration::try_from_secs_f64(opts.timeout).context("Invalid timeout")?;
    let mut config = SolverConfig::default().with_time_limit(time_limit);
    if let Some(mib) = opts.memory_limit {
        config = config.with_memory_limit(mib << 20);
    }

    let instances = list_instances(&opts.path)?;
    info!("Found {} instance(s) in {}", instances.len(), opts.path.display());

    let mut failures = 0;
    for path in instances {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        match solve_instance(&path, config) {
            Ok(solution) => {
                info!("{name}: {} | {}", solution.status, solution.stats);
                if opts.json {
                    let report = Report {
                        instance: &name,
                        solution: &solution,
                    };
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{name} {}", solution.cost);
                }
            }
            Err(err) => {
                failures += 1;
                error!("{name}: {err:#}");
                if opts.json {
                    let report = serde_json::json!({ "instance": name, "error": format!("{err:#}") });
                    println!("{report}");
                } else {
                    println!("{name} {}", f64::INFINITY);
                }
            }
        }
    }

    if failures > 0 {
        warn!("{failures} instance(s) could not be solved");
    }

    Ok(())
}

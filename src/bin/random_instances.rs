use std::{fs, path::PathBuf, str::FromStr};

use ::log::{LevelFilter, info};
use anyhow::Context;
use rand::SeedableRng;
use structopt::StructOpt;
use tsp_bnb::{log::build_logger_for_verbosity, prelude::*};

#[derive(Debug, Clone, Copy)]
enum Kind {
    Uniform,
    Symmetric,
    Sparse,
    Euclidean,
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "uniform" => Kind::Uniform,
            "symmetric" => Kind::Symmetric,
            "sparse" => Kind::Sparse,
            "euclidean" => Kind::Euclidean,
            _ => anyhow::bail!("Unknown instance kind {s:?}"),
        })
    }
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Writes random travelling salesman instances")]
struct Opt {
    /// Directory the instances are written to
    #[structopt(parse(from_os_str))]
    output: PathBuf,

    /// Number of cities; may be given several times
    #[structopt(short = "n", long, default_value = "10")]
    cities: Vec<u32>,

    /// Instances per number of cities
    #[structopt(short, long, default_value = "10")]
    repeats: u32,

    #[structopt(short, long, default_value = "uniform", possible_values = &["uniform", "symmetric", "sparse", "euclidean"])]
    kind: Kind,

    /// Largest edge cost (or side length of the square for euclidean instances)
    #[structopt(long, default_value = "100")]
    max_cost: u32,

    /// Probability of an edge for sparse instances
    #[structopt(short = "p", long, default_value = "0.5")]
    prob_edge: f64,

    #[structopt(short, long, default_value = "1234")]
    seed: u64,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opt.verbose);

    anyhow::ensure!(opt.max_cost >= 1, "Costs have to be at least 1");
    anyhow::ensure!(
        (0.0..=1.0).contains(&opt.prob_edge),
        "Edge probability has to be within [0, 1]"
    );

    fs::create_dir_all(&opt.output)
        .with_context(|| format!("Cannot create {}", opt.output.display()))?;

    let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(opt.seed);
    let costs = 1..=opt.max_cost;

    for &n in &opt.cities {
        for i in 0..opt.repeats {
            let matrix = match opt.kind {
                Kind::Uniform => CostMatrix::random_uniform(&mut rng, n, costs.clone()),
                Kind::Symmetric => CostMatrix::random_symmetric(&mut rng, n, costs.clone()),
                Kind::Sparse => {
                    CostMatrix::random_sparse(&mut rng, n, costs.clone(), opt.prob_edge)
                }
                Kind::Euclidean => CostMatrix::random_euclidean(&mut rng, n, opt.max_cost as f64),
            };

            let path = opt
                .output
                .join(format!("{:?}_n{n:03}_{i:03}.tsp", opt.kind).to_lowercase());
            matrix.try_write_matrix_file(&path)?;
            info!("Wrote {} with {} edges", path.display(), matrix.number_of_edges());
        }
    }

    Ok(())
}

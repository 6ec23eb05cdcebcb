use std::{
    io::Write,
    sync::LazyLock,
    time::Instant,
};

use log::LevelFilter;

/// Installs an `env_logger` that prefixes every record with `c `, so log output interleaved with
/// results on stdout reads as comments in the instance file format. `RUST_LOG` still overrides
/// the given level.
pub fn build_logger_for_level(level: LevelFilter) {
    LazyLock::force(&START);
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "c {:>5} [{:>8.3}s] {}",
                record.level(),
                START.elapsed().as_secs_f64(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok();
}

/// Each occurrence of `-v` raises `base` by one level, up to `Trace`
pub fn build_logger_for_verbosity(base: LevelFilter, verbosity: usize) {
    let level = LevelFilter::iter()
        .skip_while(|&l| l != base)
        .nth(verbosity)
        .unwrap_or(LevelFilter::Trace);
    build_logger_for_level(level);
}

static START: LazyLock<Instant> = LazyLock::new(Instant::now);

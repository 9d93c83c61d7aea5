//! Train a spatio-temporal Hawkes model on an event file, or on simulated
//! sequences when no file is given.
//!
//! Two layouts are read, chosen by extension:
//! - `.npy`: a dense `(n_sequences, max_len, 3)` float64 or float32 array,
//!   zero-padded after the last event of each sequence;
//! - anything else: JSON, one array of `[t, x, y]` events per sequence, with
//!   sequences of any length.
//!
//! ```text
//! RUST_LOG=info train_hawkes --data events.npy --epochs 15 --batch-size 50
//! ```
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use ndarray::Array3;
use ndarray_npy::read_npy;
use rust_pointprocess::{
    hawkes::prelude::*,
    optimization::loglik_optimizer::{MLEOptions, Tolerances},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "train_hawkes", about = "Fit a marked spatio-temporal Hawkes process by MLE")]
struct Args {
    /// `.npy` array of shape (n_sequences, max_len, 3), or a JSON file of
    /// event sequences `[[[t, x, y], ...], ...]`.
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long, default_value_t = 15)]
    epochs: usize,

    #[arg(long, default_value_t = 50)]
    batch_size: usize,

    #[arg(long, default_value_t = 1e-3)]
    lr: f64,

    /// Keep only the latest k events of each prefix.
    #[arg(long)]
    cutoff: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Observation window is [0, t_max].
    #[arg(long, default_value_t = 10.0)]
    t_max: f64,

    /// Kernel constant C.
    #[arg(long, default_value_t = 0.5)]
    c: f64,

    /// Sequences to simulate when --data is absent.
    #[arg(long, default_value_t = 50)]
    n_sim: usize,

    /// Report standard errors on the first batch after training.
    #[arg(long)]
    std_errors: bool,
}

fn load_events(path: &Path) -> Result<EventBatch> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("npy") => load_npy(path),
        _ => load_json(path),
    }
}

fn load_npy(path: &Path) -> Result<EventBatch> {
    let events: Array3<f64> = match read_npy::<_, Array3<f64>>(path) {
        Ok(arr) => arr,
        Err(_) => read_npy::<_, Array3<f32>>(path)
            .with_context(|| format!("reading {} as a 3-D float array", path.display()))?
            .mapv(f64::from),
    };
    Ok(EventBatch::new(events)?)
}

fn load_json(path: &Path) -> Result<EventBatch> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let sequences: Vec<Vec<[f64; 3]>> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {} as event sequences", path.display()))?;
    Ok(EventBatch::from_sequences(&sequences)?)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "rust_pointprocess=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let model = SpatialTemporalHawkes::new(
        TimeHorizon::new(0.0, args.t_max)?,
        SpatialDomain::new((-1.0, 1.0), (-1.0, 1.0))?,
        args.c,
    )?;

    let data = match &args.data {
        Some(path) => load_events(path)?,
        None => {
            let truth = HawkesParams::new(0.2, 1.0, 0.1, 0.1)?;
            info!(n_sequences = args.n_sim, ?truth, "simulating training data");
            simulate_batch(&model, &truth, &SimOpts::new(args.n_sim, 20, args.seed)?)?
        }
    };
    info!(n_sequences = data.n_sequences(), max_len = data.max_len(), "data loaded");

    let tols = Tolerances::new(Some(1e-6), None, Some(300))?;
    let mle_opts = MLEOptions::new(tols, args.lr, false)?;
    let mut options = HawkesOptions::new(args.batch_size, 3, args.cutoff, mle_opts)?;
    if let Some(seed) = args.seed {
        options = options.with_seed(seed);
    }

    let mut mle = HawkesMLE::new(model, options);
    let report = mle.train(args.epochs, &data, false).context("training failed")?;

    for epoch in &report.epochs {
        println!("epoch {:>3}  avg cost {:.6}", epoch.epoch, epoch.avg_cost);
    }
    let p = report.params;
    println!("mu = {:.6}, beta = {:.6}, sigma_x = {:.6}, sigma_y = {:.6}", p.mu, p.beta, p.sigma_x, p.sigma_y);

    if args.std_errors {
        let indices: Vec<usize> = (0..args.batch_size).collect();
        let se = mle.standard_errors(&data.select(&indices))?;
        println!("std errors: {se}");
    }
    Ok(())
}

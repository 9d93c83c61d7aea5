//! Synthetic event sequences from a spatio-temporal Hawkes process.
//!
//! Uses the cluster (branching) representation:
//! - immigrants arrive as a Poisson process with rate μ on `T × S`;
//! - every event spawns `Poisson(C/β)` children at lag `Exp(β)` with a
//!   Gaussian offset of variances `σx² Δt` and `σy² Δt`;
//! - children past `t_max` or outside `S` are discarded together with
//!   their own descendants.
//!
//! Sequences are sorted in time, cut to `max_len`, and zero-padded into an
//! [`EventBatch`]. A branching ratio `C/β ≥ 1` is rejected up front since the
//! cluster sizes are then unbounded in expectation.
use crate::hawkes::{
    core::{
        data::{DATA_DIM, EventBatch, TIME, X, Y},
        intensity::SpatialTemporalHawkes,
        params::HawkesParams,
    },
    errors::{HawkesError, HawkesResult},
};
use ndarray::Array3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Poisson, StandardNormal};

/// Hard cap on events generated for one sequence before truncation.
pub const MAX_CLUSTER_EVENTS: usize = 1_000_000;

/// Simulation-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOpts {
    pub n_sequences: usize,
    pub max_len: usize,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl SimOpts {
    /// # Errors
    /// - [`HawkesError::InvalidSimulation`] if `n_sequences` or `max_len` is 0.
    pub fn new(n_sequences: usize, max_len: usize, seed: Option<u64>) -> HawkesResult<Self> {
        if n_sequences == 0 || max_len == 0 {
            return Err(HawkesError::InvalidSimulation {
                reason: format!("need n_sequences > 0 and max_len > 0, got {n_sequences} and {max_len}"),
            });
        }
        Ok(Self { n_sequences, max_len, seed })
    }
}

/// Simulate `opts.n_sequences` independent sequences into a padded batch.
///
/// # Errors
/// - [`HawkesError::Supercritical`] when `C/β ≥ 1`.
/// - [`HawkesError::InvalidSimulation`] when a distribution cannot be built
///   or a cluster exceeds [`MAX_CLUSTER_EVENTS`].
pub fn simulate_batch(
    model: &SpatialTemporalHawkes, params: &HawkesParams, opts: &SimOpts,
) -> HawkesResult<EventBatch> {
    let mut rng = match opts.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut events = Array3::<f64>::zeros((opts.n_sequences, opts.max_len, DATA_DIM));
    for b in 0..opts.n_sequences {
        let sequence = simulate_sequence(model, params, opts.max_len, &mut rng)?;
        for (i, event) in sequence.iter().enumerate() {
            events[[b, i, TIME]] = event[TIME];
            events[[b, i, X]] = event[X];
            events[[b, i, Y]] = event[Y];
        }
    }
    EventBatch::new(events)
}

/// Simulate one sequence: sorted, at most `max_len` events, all with
/// `t_min < t ≤ t_max` and inside `S`.
///
/// # Errors
/// - Same as [`simulate_batch`].
pub fn simulate_sequence<R: Rng + ?Sized>(
    model: &SpatialTemporalHawkes, params: &HawkesParams, max_len: usize, rng: &mut R,
) -> HawkesResult<Vec<[f64; DATA_DIM]>> {
    let c = model.kernel().c();
    let ratio = c / params.beta;
    if ratio >= 1.0 {
        return Err(HawkesError::Supercritical { ratio });
    }
    let (horizon, domain) = (model.horizon(), model.domain());

    let immigrant_mean = params.mu * domain.area() * horizon.length();
    let n_immigrants: f64 = Poisson::new(immigrant_mean).map_err(sim_error)?.sample(rng);
    let offspring = Poisson::new(ratio).map_err(sim_error)?;
    let lag = Exp::new(params.beta).map_err(sim_error)?;

    // 1 - u lies in (0, 1], so immigrant times are strictly after t_min ≥ 0.
    let mut frontier: Vec<[f64; DATA_DIM]> = (0..n_immigrants as usize)
        .map(|_| {
            [
                horizon.min + horizon.length() * (1.0 - rng.gen::<f64>()),
                rng.gen_range(domain.x.0..=domain.x.1),
                rng.gen_range(domain.y.0..=domain.y.1),
            ]
        })
        .collect();

    let mut events = Vec::with_capacity(frontier.len());
    while let Some(parent) = frontier.pop() {
        events.push(parent);
        if events.len() > MAX_CLUSTER_EVENTS {
            return Err(HawkesError::InvalidSimulation {
                reason: format!("cluster exceeded {MAX_CLUSTER_EVENTS} events"),
            });
        }
        let n_children: f64 = offspring.sample(rng);
        for _ in 0..n_children as usize {
            let dt: f64 = lag.sample(rng);
            let t = parent[TIME] + dt;
            if t > horizon.max {
                continue;
            }
            let zx: f64 = StandardNormal.sample(rng);
            let zy: f64 = StandardNormal.sample(rng);
            let x = parent[X] + params.sigma_x * dt.sqrt() * zx;
            let y = parent[Y] + params.sigma_y * dt.sqrt() * zy;
            if domain.contains(x, y) {
                frontier.push([t, x, y]);
            }
        }
    }

    events.sort_by(|a, b| a[TIME].total_cmp(&b[TIME]));
    events.truncate(max_len);
    Ok(events)
}

fn sim_error<E: std::fmt::Display>(err: E) -> HawkesError {
    HawkesError::InvalidSimulation { reason: err.to_string() }
}

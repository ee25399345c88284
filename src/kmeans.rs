//! Lloyd's k-means over RGB points.
//!
//! Randomness (initial seeds, re-seeding of empty clusters) always comes from a
//! caller-supplied [`Rng`], so a fixed seed gives a fixed result.

use log::{debug, trace};
use palette::Srgb;
use rand::{Rng, SeedableRng, seq::index};
use rand_chacha::ChaCha8Rng;

use crate::color::round_to_srgb;
use crate::error::{ColpickError, Result};

/// One pixel color.
pub type Point = [u8; 3];

/// Real-valued cluster center in RGB space.
pub type Centroid = [f64; 3];

pub const DEFAULT_K: usize = 5;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

// Convergence tolerances, compared as |old - new| <= ATOL + RTOL * |new|.
const RTOL: f64 = 1e-5;
const ATOL: f64 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KMeans {
    pub k: usize,
    pub max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Outcome of a single k-means run.
#[derive(Clone, Debug, PartialEq)]
pub struct Clustering {
    /// Exactly `k` centers, in cluster index order.
    pub centroids: Vec<Centroid>,
    /// Number of assign/update rounds performed.
    pub iterations: usize,
    /// `false` when the iteration cap was hit first.
    pub converged: bool,
}

impl Clustering {
    /// Centers rounded to 8-bit colors, order preserved.
    pub fn colors(&self) -> Vec<Srgb<u8>> {
        self.centroids.iter().copied().map(round_to_srgb).collect()
    }
}

impl KMeans {
    pub fn new(k: usize, max_iterations: usize) -> Self {
        Self { k, max_iterations }
    }

    fn validate(&self, points: &[Point]) -> Result<()> {
        if self.k == 0 {
            return Err(ColpickError::invalid_parameter("k", self.k));
        }
        if self.max_iterations == 0 {
            return Err(ColpickError::invalid_parameter(
                "max_iterations",
                self.max_iterations,
            ));
        }
        if points.len() < self.k {
            return Err(ColpickError::InsufficientData {
                points: points.len(),
                k: self.k,
            });
        }
        Ok(())
    }

    /// Run Lloyd's algorithm, drawing all randomness from `rng`.
    pub fn run<R: Rng + ?Sized>(&self, points: &[Point], rng: &mut R) -> Result<Clustering> {
        self.validate(points)?;
        debug!(
            "k-means start: {} points, k = {}, max_iterations = {}",
            points.len(),
            self.k,
            self.max_iterations
        );

        let mut centroids = initial_centroids(points, self.k, rng);
        let mut labels = vec![0usize; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        for _ in 0..self.max_iterations {
            iterations += 1;

            assign(points, &centroids, &mut labels);
            let next = update(points, &labels, self.k, rng);

            if all_close(&centroids, &next) {
                converged = true;
                break;
            }
            centroids = next;
        }

        debug!("k-means done after {iterations} iteration(s), converged = {converged}");

        Ok(Clustering {
            centroids,
            iterations,
            converged,
        })
    }

    /// Same as [`KMeans::run`] with a ChaCha8 generator seeded from `seed`.
    pub fn run_seeded(&self, points: &[Point], seed: u64) -> Result<Clustering> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.run(points, &mut rng)
    }
}

/// Cluster `points` into `k` colors and return them rounded, in cluster order.
///
/// Fails with [`ColpickError::InsufficientData`] when there are fewer points than
/// clusters. Hitting `max_iterations` is not an error; the last centers are returned.
pub fn cluster<R: Rng + ?Sized>(
    points: &[Point],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Vec<Srgb<u8>>> {
    let clustering = KMeans::new(k, max_iterations).run(points, rng)?;
    Ok(clustering.colors())
}

fn to_centroid(p: Point) -> Centroid {
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

/// k distinct indices, uniformly without replacement.
fn initial_centroids<R: Rng + ?Sized>(points: &[Point], k: usize, rng: &mut R) -> Vec<Centroid> {
    index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| to_centroid(points[i]))
        .collect()
}

#[inline]
fn dist_sq(p: Point, c: &Centroid) -> f64 {
    let dr = p[0] as f64 - c[0];
    let dg = p[1] as f64 - c[1];
    let db = p[2] as f64 - c[2];
    dr * dr + dg * dg + db * db
}

/// Index of the closest centroid. Equidistant centroids resolve to the lowest index.
pub(crate) fn nearest(p: Point, centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, c) in centroids.iter().enumerate() {
        let d = dist_sq(p, c);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}

fn assign(points: &[Point], centroids: &[Centroid], labels: &mut [usize]) {
    for (label, &p) in labels.iter_mut().zip(points) {
        *label = nearest(p, centroids);
    }
}

/// Per-cluster means; an empty cluster takes a random point from the whole set.
fn update<R: Rng + ?Sized>(
    points: &[Point],
    labels: &[usize],
    k: usize,
    rng: &mut R,
) -> Vec<Centroid> {
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for (&p, &label) in points.iter().zip(labels) {
        let s = &mut sums[label];
        s[0] += p[0] as f64;
        s[1] += p[1] as f64;
        s[2] += p[2] as f64;
        counts[label] += 1;
    }

    sums.iter()
        .zip(&counts)
        .enumerate()
        .map(|(cluster, (s, &n))| {
            if n == 0 {
                let pick = rng.random_range(0..points.len());
                trace!("cluster {cluster} empty, re-seeding from point {pick}");
                to_centroid(points[pick])
            } else {
                let n = n as f64;
                [s[0] / n, s[1] / n, s[2] / n]
            }
        })
        .collect()
}

fn all_close(old: &[Centroid], new: &[Centroid]) -> bool {
    old.iter().zip(new).all(|(a, b)| {
        a.iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= ATOL + RTOL * y.abs())
    })
}

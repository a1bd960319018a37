//! Write sample simulation output for trying out `ehrenfest-plot`.
//!
//! Runs the Ehrenfest urn model for a few particle counts and writes one file
//! per count in the format the plotter reads:
//! `<equilibrium steps> <poincare steps> <h_0> ... <h_N>` per trial.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

const PARTICLE_COUNTS: [usize; 4] = [4, 6, 8, 10];
const TRIALS: usize = 30;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        ((self.next_u64() >> 11) as f64 / (1u64 << 53) as f64 * n as f64) as usize
    }
}

/// One trial: all particles start in the first box; each step moves one
/// uniformly chosen particle to the other box. Runs until the populations
/// have been equal once and the starting state has recurred.
struct Trial {
    equilibrium: u64,
    poincare: u64,
    /// Steps spent with `k` particles in the first box, for `k` in `0..=N`.
    history: Vec<u64>,
}

fn run_trial(n: usize, rng: &mut SimpleRng) -> Trial {
    let mut in_first = vec![true; n];
    let mut count = n;
    let mut history = vec![0u64; n + 1];
    let (mut equilibrium, mut poincare) = (0u64, 0u64);
    let mut step = 0u64;

    while equilibrium == 0 || poincare == 0 {
        step += 1;
        let p = rng.below(n);
        in_first[p] = !in_first[p];
        if in_first[p] {
            count += 1;
        } else {
            count -= 1;
        }
        history[count] += 1;

        if equilibrium == 0 && count == n / 2 {
            equilibrium = step;
        }
        if poincare == 0 && count == n {
            poincare = step;
        }
    }

    Trial {
        equilibrium,
        poincare,
        history,
    }
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    for n in PARTICLE_COUNTS {
        let mut text = format!("# equilibrium poincare h_0..h_{n}\n");
        for _ in 0..TRIALS {
            let trial = run_trial(n, &mut rng);
            let _ = write!(text, "{} {}", trial.equilibrium, trial.poincare);
            for h in &trial.history {
                let _ = write!(text, " {h}");
            }
            text.push('\n');
        }

        let path = out_dir.join(format!("ehrenfest_n{n}.dat"));
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {TRIALS} trials of N = {n} to {}", path.display());
    }

    Ok(())
}

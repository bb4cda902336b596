use std::hash::Hash;

use demography::{DispersalKernel, Generation, Store};
use rand::Rng;

use crate::CoalescentError;

/// Drives the forward demographic simulation, writing size and flow entries
/// into an owned [`Store`] one generation at a time.
pub struct ForwardHistory<X> {
    store: Store<X>,
}

impl<X> ForwardHistory<X>
where
    X: Clone + Eq + Hash + std::fmt::Debug,
{
    pub fn new(x0: X, t0: Generation, n0: u64) -> Self {
        Self {
            store: Store::new(x0, t0, n0),
        }
    }

    pub fn store(&self) -> &Store<X> {
        &self.store
    }

    /// Advances the recorded history by `generations` steps.
    ///
    /// `growth(rng, x, t, n)` draws the pre-dispersal emigrant count at deme
    /// `x`, generation `t`, given its current recorded size `n` (typically
    /// Poisson around a deterministic logistic expectation of `n`, left to
    /// the caller). Every departure at `t` is written before any arrival at
    /// `t + 1` is read, so cross-deme aggregation at `t + 1` always sees a
    /// complete generation.
    pub fn expand<R, G>(
        &mut self,
        generations: u32,
        mut growth: G,
        kernel: &DispersalKernel<X>,
        rng: &mut R,
    ) -> Result<(), CoalescentError>
    where
        R: Rng + ?Sized,
        G: FnMut(&mut R, &X, Generation, u64) -> u64,
    {
        for _ in 0..generations {
            let t = self.store.last_time();
            let demes: Vec<X> = self.store.demes_with_positive_size(t).cloned().collect();

            let mut total_emission: u64 = 0;

            for x in &demes {
                let n = self.store.get_size(x, t);
                let n_tilde = growth(rng, x, t, n);
                if n_tilde == 0 {
                    continue;
                }
                total_emission += n_tilde;

                match kernel {
                    DispersalKernel::IndividualBased(individual) => {
                        for _ in 0..n_tilde {
                            let y = individual.sample_arrival(rng, x)?;
                            self.store.add_flow(x.clone(), y.clone(), t, 1);
                            self.store.add_size(y, t.next(), 1);
                        }
                    }
                    DispersalKernel::MassBased(mass) => {
                        for y in mass.arrival_space(x)? {
                            let rate = mass.rate(x, &y)?;
                            let n_m = (rate * n_tilde as f64).floor() as u64;
                            if n_m > 0 {
                                self.store.set_flow(x.clone(), y.clone(), t, n_m);
                                self.store.add_size(y, t.next(), n_m);
                            }
                        }
                    }
                }
            }

            log::debug!("generation {t}: total emission = {total_emission}");

            if total_emission == 0 {
                return Err(CoalescentError::ExtinctedBeforeSampling { time: t });
            }
        }

        Ok(())
    }
}

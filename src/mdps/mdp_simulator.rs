use super::mdp::{Mdp, Transition, Transitions};
use crate::{Continous, Discrete, Error, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub r: Continous,
}

pub trait EpisodeGenerator {
    fn generate(&self, n: usize) -> Result<Vec<Vec<EpisodeEvent>>>;
}

pub trait Weighted {
    type State;

    fn s(&self) -> Self::State;

    fn p(&self) -> Continous;
}

impl Weighted for Transition {
    type State = Discrete;

    fn s(&self) -> Discrete {
        self.next_state
    }

    fn p(&self) -> Continous {
        self.probability
    }
}

/// Draws one item with probability proportional to its weight.
pub fn pick_next<'a, T, R>(rng: &mut R, ts: &'a [T]) -> Result<&'a T>
where
    T: Weighted,
    R: Rng + ?Sized,
{
    let dist = WeightedIndex::new(ts.iter().map(|item| item.p()))?;
    Ok(&ts[dist.sample(rng)])
}

/// Rolls out episodes under a uniform random policy.
///
/// Each episode starts with `{ s: start, r: 0 }` and ends on a `done` outcome
/// or after `max_steps` steps, whichever comes first.
pub struct RandomEpisodes {
    transitions: Rc<Transitions>,
    n_a: usize,
    start: Discrete,
    seed: u64,
    max_steps: usize,
}

impl RandomEpisodes {
    pub fn new(mdp: &dyn Mdp, start: Discrete, seed: u64, max_steps: usize) -> Self {
        Self {
            transitions: mdp.transitions(),
            n_a: mdp.n_a(),
            start,
            seed,
            max_steps,
        }
    }
}

impl EpisodeGenerator for RandomEpisodes {
    fn generate(&self, n: usize) -> Result<Vec<Vec<EpisodeEvent>>> {
        let mut eps = Vec::with_capacity(n);

        let rng = &mut StdRng::seed_from_u64(self.seed);
        for _ in 0..n {
            let mut s = self.start;
            let mut ep = vec![EpisodeEvent { s, r: 0. }];
            for _ in 0..self.max_steps {
                let a = rng.gen_range(0..self.n_a);
                let ts = self
                    .transitions
                    .get(&(s, a))
                    .ok_or(Error::InvalidStateAction { state: s, action: a })?;
                let next = pick_next(rng, ts)?;
                ep.push(EpisodeEvent {
                    s: next.next_state,
                    r: next.reward,
                });
                if next.is_done() {
                    break;
                }

                s = next.next_state;
            }
            eps.push(ep);
        }

        Ok(eps)
    }
}

#[cfg(test)]
mod tests {
    use super::{pick_next, Weighted};
    use crate::Error;
    use float_eq::*;
    use rand::prelude::*;

    #[test]
    fn test_pick_next_seeded() {
        let items = &mut vec![
            TX {
                s: 0,
                p: 0.2,
                count: 0,
            },
            TX {
                s: 1,
                p: 0.8,
                count: 0,
            },
        ];

        let rng = &mut StdRng::seed_from_u64(2718);
        let n = 10000;
        for _ in 0..n {
            let i = pick_next(rng, &items[..]).unwrap().s();
            items[i].count += 1;
        }

        assert_float_eq!(items[0].count as f32 / n as f32, 0.2, abs <= 2e-2);
        assert_float_eq!(items[1].count as f32 / n as f32, 0.8, abs <= 2e-2);
    }

    #[test]
    fn test_pick_next_empty() {
        let items: Vec<TX> = vec![];
        let rng = &mut StdRng::seed_from_u64(0);

        assert!(matches!(pick_next(rng, &items), Err(Error::Sampling(_))));
    }

    struct TX {
        pub s: usize,
        pub p: f64,
        pub count: i32,
    }

    impl Weighted for TX {
        type State = usize;

        fn p(&self) -> f64 {
            self.p
        }

        fn s(&self) -> usize {
            self.s
        }
    }
}

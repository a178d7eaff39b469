use crate::{Continous, Discrete};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::ops::Index;
use std::rc::Rc;

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn transitions(&self) -> Rc<Transitions>;
}

/// One possible result of taking an action in a state.
///
/// `done` is `None` when the model does not track terminal information.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next_state: Discrete,
    pub probability: Continous,
    pub reward: Continous,
    pub done: Option<bool>,
}

impl Transition {
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }
}

/// Serialized as `[p, s', r]` or `[p, s', r, done]`, the tuple layout gym exposes as `P[s][a]`.
impl Serialize for Transition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.done.is_some() { 4 } else { 3 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.probability)?;
        seq.serialize_element(&self.next_state)?;
        seq.serialize_element(&self.reward)?;
        if let Some(done) = self.done {
            seq.serialize_element(&done)?;
        }
        seq.end()
    }
}

pub type Transitions = HashMap<(Discrete, Discrete), Vec<Transition>>;

/// Dense `[state][action]` outcome table.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    n_a: usize,
    table: Vec<Vec<Transition>>,
}

impl Model {
    pub(crate) fn from_rows(n_a: usize, table: Vec<Vec<Transition>>) -> Self {
        debug_assert!(n_a > 0 && table.len() % n_a == 0);
        Self { n_a, table }
    }

    pub fn n_s(&self) -> usize {
        self.table.len() / self.n_a
    }

    pub fn n_a(&self) -> usize {
        self.n_a
    }

    pub fn get(&self, s: Discrete, a: Discrete) -> Option<&[Transition]> {
        if a >= self.n_a {
            return None;
        }

        self.table.get(s * self.n_a + a).map(Vec::as_slice)
    }

    /// Iterates `((s, a), outcomes)` in state-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((Discrete, Discrete), &[Transition])> + '_ {
        let n_a = self.n_a;
        self.table
            .iter()
            .enumerate()
            .map(move |(i, ts)| ((i / n_a, i % n_a), ts.as_slice()))
    }

    pub fn to_transitions(&self) -> Transitions {
        self.iter().map(|(k, ts)| (k, ts.to_vec())).collect()
    }

    /// Nested `{"s": {"a": [[p, s', r(, done)], ...]}}` layout.
    pub fn to_json(&self) -> crate::Result<String> {
        let mut nested: BTreeMap<Discrete, BTreeMap<Discrete, &[Transition]>> = BTreeMap::new();
        for ((s, a), ts) in self.iter() {
            nested.entry(s).or_default().insert(a, ts);
        }

        Ok(serde_json::to_string(&nested)?)
    }
}

impl Index<(Discrete, Discrete)> for Model {
    type Output = [Transition];

    fn index(&self, (s, a): (Discrete, Discrete)) -> &Self::Output {
        assert!(a < self.n_a, "action {a} out of range (n_a = {})", self.n_a);
        &self.table[s * self.n_a + a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(next_state: Discrete, probability: f64, reward: f64, done: Option<bool>) -> Transition {
        Transition {
            next_state,
            probability,
            reward,
            done,
        }
    }

    fn two_by_two() -> Model {
        Model::from_rows(
            2,
            vec![
                vec![t(0, 1., -0.5, None)],
                vec![t(1, 1., 0., None)],
                vec![t(0, 0.5, 2.5, None), t(1, 0.5, 2.5, None)],
                vec![t(1, 1., 0., None)],
            ],
        )
    }

    #[test]
    fn shape_and_lookup() {
        let m = two_by_two();

        assert_eq!(m.n_s(), 2);
        assert_eq!(m.n_a(), 2);
        assert_eq!(m.get(1, 0).map(<[_]>::len), Some(2));
        assert_eq!(m[(0, 1)], [t(1, 1., 0., None)]);
        assert!(m.get(0, 2).is_none());
        assert!(m.get(2, 0).is_none());
    }

    #[test]
    fn transitions_keyed_by_state_action() {
        let ts = two_by_two().to_transitions();

        assert_eq!(ts.len(), 4);
        assert_eq!(ts[&(1, 0)].len(), 2);
        assert_eq!(ts[&(0, 0)][0].next_state, 0);
    }

    #[test]
    fn json_layout_omits_untracked_done() {
        let json = two_by_two().to_json().unwrap();

        assert_eq!(
            json,
            r#"{"0":{"0":[[1.0,0,-0.5]],"1":[[1.0,1,0.0]]},"1":{"0":[[0.5,0,2.5],[0.5,1,2.5]],"1":[[1.0,1,0.0]]}}"#
        );
    }

    #[test]
    fn json_layout_carries_done_when_tracked() {
        let m = Model::from_rows(1, vec![vec![t(0, 1., 0., Some(true))]]);

        assert_eq!(m.to_json().unwrap(), r#"{"0":{"0":[[1.0,0,0.0,true]]}}"#);
    }
}

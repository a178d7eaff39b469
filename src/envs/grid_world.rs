use super::grid_map::{Cell, GridMap, Position};
use crate::mdps::mdp::{Mdp, Model, Transition, Transitions};
use crate::mdps::mdp_simulator::pick_next;
use crate::{Continous, Discrete, Error, Result};
use itertools::iproduct;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, trace};

const PROBABILITY_TOLERANCE: Continous = 1e-9;

/// A directional move and the glyph used to display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub delta: (isize, isize),
    pub glyph: char,
}

impl Action {
    pub const LEFT: Action = Action {
        delta: (0, -1),
        glyph: '←',
    };
    pub const DOWN: Action = Action {
        delta: (1, 0),
        glyph: '↓',
    };
    pub const RIGHT: Action = Action {
        delta: (0, 1),
        glyph: '→',
    };
    pub const UP: Action = Action {
        delta: (-1, 0),
        glyph: '↑',
    };

    /// left, down, right, up.
    pub fn compass() -> Vec<Action> {
        vec![Self::LEFT, Self::DOWN, Self::RIGHT, Self::UP]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jump {
    pub target: Cell,
    pub probability: Continous,
    pub reward: Continous,
}

/// Dynamics of a cell type. The chosen action only matters for `Walk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Move by the action delta. Leaving the grid is a self-loop with the bump
    /// penalty; entering a terminal cell ends the episode.
    Walk,
    Teleport { target: Cell, reward: Continous },
    TeleportSplit { jumps: Vec<Jump> },
    /// Absorbing self-loop.
    Terminal,
}

/// Reward shaping constants used by `Rule::Walk` and `Rule::Terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    pub bump: Continous,
    pub step: Continous,
    pub enter_terminal: Continous,
    pub stay_terminal: Continous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRule {
    pub cell: Cell,
    pub rule: Rule,
}

/// Everything needed to build a grid-world model.
///
/// A cell type without an entry in `rules` is outside the variant's alphabet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub name: String,
    pub map: Vec<String>,
    pub actions: Vec<Action>,
    pub rules: Vec<CellRule>,
    pub rewards: Rewards,
    /// When false, outcomes carry no terminal flag (`done == None`).
    pub track_terminal: bool,
}

impl GridConfig {
    pub fn rule(&self, cell: Cell) -> Option<&Rule> {
        self.rules.iter().find(|r| r.cell == cell).map(|r| &r.rule)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A grid-world together with its fully built transition model.
#[derive(Debug, Clone)]
pub struct GridWorld {
    name: String,
    map: GridMap,
    actions: Vec<Action>,
    track_terminal: bool,
    model: Model,
    transitions: Rc<Transitions>,
}

impl GridWorld {
    pub fn new(config: GridConfig) -> Result<Self> {
        let map = GridMap::parse(&config.map)?;
        if config.actions.is_empty() {
            return Err(Error::NoActions);
        }

        let builder = ModelBuilder {
            config: &config,
            map: &map,
        };
        let table = iproduct!(map.iter(), config.actions.iter())
            .map(|((here, cell), action)| builder.outcomes(here, cell, action))
            .collect::<Result<Vec<_>>>()?;
        let model = Model::from_rows(config.actions.len(), table);
        check_probability_mass(&model)?;

        debug!(
            name = %config.name,
            rows = map.rows(),
            cols = map.cols(),
            n_s = model.n_s(),
            n_a = model.n_a(),
            "built grid-world model"
        );

        let transitions = Rc::new(model.to_transitions());
        Ok(Self {
            name: config.name,
            map,
            actions: config.actions,
            track_terminal: config.track_terminal,
            model,
            transitions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action_text(&self) -> Vec<char> {
        self.actions.iter().map(|a| a.glyph).collect()
    }

    pub fn tracks_terminal(&self) -> bool {
        self.track_terminal
    }

    pub fn state_of(&self, p: Position) -> Option<Discrete> {
        (p.row < self.map.rows() && p.col < self.map.cols()).then(|| state_id(&self.map, p))
    }

    pub fn position_of(&self, s: Discrete) -> Option<Position> {
        (s < self.model.n_s()).then(|| Position::new(s / self.map.cols(), s % self.map.cols()))
    }

    pub fn is_terminal(&self, s: Discrete) -> bool {
        self.position_of(s)
            .and_then(|p| self.map.cell(p))
            .is_some_and(|c| c == Cell::Terminal)
    }

    pub fn outcomes(&self, s: Discrete, a: Discrete) -> Result<&[Transition]> {
        self.model
            .get(s, a)
            .ok_or(Error::InvalidStateAction { state: s, action: a })
    }

    /// Samples one outcome of taking `a` in `s`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        s: Discrete,
        a: Discrete,
    ) -> Result<&Transition> {
        pick_next(rng, self.outcomes(s, a)?)
    }
}

impl Mdp for GridWorld {
    fn n_s(&self) -> usize {
        self.model.n_s()
    }

    fn n_a(&self) -> usize {
        self.model.n_a()
    }

    fn transitions(&self) -> Rc<Transitions> {
        Rc::clone(&self.transitions)
    }
}

fn state_id(map: &GridMap, p: Position) -> Discrete {
    p.row * map.cols() + p.col
}

struct ModelBuilder<'a> {
    config: &'a GridConfig,
    map: &'a GridMap,
}

impl ModelBuilder<'_> {
    fn outcomes(&self, here: Position, cell: Cell, action: &Action) -> Result<Vec<Transition>> {
        let s = state_id(self.map, here);
        let rule = self.config.rule(cell).ok_or(Error::InvalidMapValue {
            symbol: cell.symbol(),
            row: here.row,
            col: here.col,
        })?;
        let rewards = &self.config.rewards;

        let ts = match rule {
            Rule::Walk => {
                let (next, reward, done) = match self.map.offset(here, action.delta) {
                    None => (s, rewards.bump, false),
                    Some(there) if self.map.cell(there) == Some(Cell::Terminal) => {
                        (state_id(self.map, there), rewards.enter_terminal, true)
                    }
                    Some(there) => (state_id(self.map, there), rewards.step, false),
                };
                vec![self.outcome(next, 1., reward, done)]
            }
            Rule::Teleport { target, reward } => {
                vec![self.outcome(self.resolve(s, *target)?, 1., *reward, false)]
            }
            Rule::TeleportSplit { jumps } => jumps
                .iter()
                .map(|j| {
                    let next = self.resolve(s, j.target)?;
                    Ok(self.outcome(next, j.probability, j.reward, false))
                })
                .collect::<Result<Vec<_>>>()?,
            Rule::Terminal => vec![self.outcome(s, 1., rewards.stay_terminal, true)],
        };

        Ok(ts)
    }

    fn resolve(&self, s: Discrete, target: Cell) -> Result<Discrete> {
        let p = self.map.locate(target)?;
        trace!(from = s, %target, row = p.row, col = p.col, "teleport target");
        Ok(state_id(self.map, p))
    }

    fn outcome(
        &self,
        next_state: Discrete,
        probability: Continous,
        reward: Continous,
        done: bool,
    ) -> Transition {
        Transition {
            next_state,
            probability,
            reward,
            done: self.config.track_terminal.then_some(done),
        }
    }
}

fn check_probability_mass(model: &Model) -> Result<()> {
    for ((s, a), ts) in model.iter() {
        let total: Continous = ts.iter().map(|t| t.probability).sum();
        let in_range = ts.iter().all(|t| t.probability > 0. && t.probability <= 1.);
        if !in_range || (total - 1.).abs() > PROBABILITY_TOLERANCE {
            return Err(Error::ProbabilityMass {
                state: s,
                action: a,
                total,
            });
        }
    }

    Ok(())
}

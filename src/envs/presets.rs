//! The two stock 5x5 maps.
//!
//! Both share the teleport cells: Blue jumps to Red, Green jumps to Red or
//! Yellow with even odds. The terminal variant adds absorbing `T` cells and a
//! per-step cost.

use super::grid_map::Cell;
use super::grid_world::{Action, CellRule, GridConfig, Jump, Rewards, Rule};

pub const TELEPORT_MAP: [&str; 5] = [
    "WBWWG", //
    "WWWWW", //
    "WWWWW", //
    "WWRWW", // Red at (3, 2)
    "WWWWY", //
];

pub const TERMINAL_MAP: [&str; 5] = [
    "WBWWG", //
    "WWWWW", //
    "TWWWT", //
    "WWWWW", //
    "TWRWY", // Red at (4, 2)
];

/// No terminal cells, no step cost, outcomes carry no terminal flag.
pub fn teleport_grid() -> GridConfig {
    GridConfig {
        name: "teleport".to_string(),
        map: TELEPORT_MAP.iter().map(|r| r.to_string()).collect(),
        actions: Action::compass(),
        rules: shared_rules(),
        rewards: Rewards {
            bump: -0.5,
            step: 0.,
            enter_terminal: 0.,
            stay_terminal: 0.,
        },
        track_terminal: false,
    }
}

/// Absorbing `T` cells and a -0.2 cost per ordinary step.
pub fn terminal_grid() -> GridConfig {
    let mut rules = shared_rules();
    rules.push(CellRule {
        cell: Cell::Terminal,
        rule: Rule::Terminal,
    });

    GridConfig {
        name: "terminal".to_string(),
        map: TERMINAL_MAP.iter().map(|r| r.to_string()).collect(),
        actions: Action::compass(),
        rules,
        rewards: Rewards {
            bump: -0.5,
            step: -0.2,
            enter_terminal: 0.,
            stay_terminal: 0.,
        },
        track_terminal: true,
    }
}

fn shared_rules() -> Vec<CellRule> {
    let walk = |cell| CellRule {
        cell,
        rule: Rule::Walk,
    };

    vec![
        walk(Cell::White),
        walk(Cell::Red),
        walk(Cell::Yellow),
        CellRule {
            cell: Cell::Blue,
            rule: Rule::Teleport {
                target: Cell::Red,
                reward: 5.,
            },
        },
        CellRule {
            cell: Cell::Green,
            rule: Rule::TeleportSplit {
                jumps: vec![
                    Jump {
                        target: Cell::Red,
                        probability: 0.5,
                        reward: 2.5,
                    },
                    Jump {
                        target: Cell::Yellow,
                        probability: 0.5,
                        reward: 2.5,
                    },
                ],
            },
        },
    ]
}

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sweeper_core::sim::SimConfig;
use sweeper_core::{CellCount, ControllerConfig, Coord, FieldSize};

/// Settings file for `sweeper play`, every key is optional.
///
/// ```toml
/// turn_delay_ms = 150
/// seed = 42
///
/// [board]
/// width = 16
/// height = 16
/// mines = 40
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub turn_delay_ms: u64,
    pub seed: Option<u64>,
    pub board: BoardConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let beginner = SimConfig::beginner();
        Self {
            width: beginner.size.width,
            height: beginner.size.height,
            mines: beginner.mines,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            turn_delay_ms: ControllerConfig::DEFAULT_TURN_DELAY.as_millis() as u64,
            seed: None,
            board: BoardConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            size: FieldSize::new(self.board.width, self.board.height),
            mines: self.board.mines,
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            turn_delay: Duration::from_millis(self.turn_delay_ms),
        }
    }
}

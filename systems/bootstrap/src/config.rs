//! TOML-backed session configuration.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use rail_defence_core::CellCoord;
use serde::Deserialize;

/// Complete configuration for a Rail Defence session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Grid layout.
    pub grid: GridConfig,
    /// Ledger parameters.
    pub economy: EconomyConfig,
    /// Mover tuning.
    pub mover: MoverConfig,
    /// Phase sequencing.
    pub phases: PhaseConfig,
}

/// Grid layout parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of cells in each row.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Side length of a cell in world units.
    pub tile_length: f32,
    /// `[column, row]` pairs that may never be occupied.
    pub blocked: Vec<[u32; 2]>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: rail_defence_world::DEFAULT_GRID_COLUMNS,
            rows: rail_defence_world::DEFAULT_GRID_ROWS,
            tile_length: rail_defence_world::DEFAULT_TILE_LENGTH,
            blocked: Vec::new(),
        }
    }
}

impl GridConfig {
    /// Blocked cells as coordinates.
    #[must_use]
    pub fn blocked_cells(&self) -> Vec<CellCoord> {
        self.blocked
            .iter()
            .map(|&[column, row]| CellCoord::new(column, row))
            .collect()
    }
}

/// Ledger parameters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyConfig {
    /// Balance at the start of every session.
    pub starting_resources: u32,
    /// Amount charged per occupied cell and refunded when it is freed.
    pub cost_per_cell: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_resources: rail_defence_world::DEFAULT_STARTING_RESOURCES,
            cost_per_cell: rail_defence_world::DEFAULT_COST_PER_CELL,
        }
    }
}

/// Mover tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoverConfig {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Input magnitude required to leave a node.
    pub input_threshold: f32,
    /// Remaining distance below which the mover snaps onto its target.
    pub arrival_epsilon: f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            speed: rail_defence_world::DEFAULT_MOVER_SPEED,
            input_threshold: rail_defence_system_movement::DEFAULT_INPUT_THRESHOLD,
            arrival_epsilon: rail_defence_world::DEFAULT_ARRIVAL_EPSILON,
        }
    }
}

/// Phase sequencing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhaseConfig {
    /// Length of the "get ready" countdown between starting and building, in milliseconds.
    pub countdown_ms: u64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self { countdown_ms: 3_000 }
    }
}

impl PhaseConfig {
    /// Countdown as a duration.
    #[must_use]
    pub const fn countdown(&self) -> Duration {
        Duration::from_millis(self.countdown_ms)
    }
}

impl GameConfig {
    /// Loads and validates the configuration stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Default location relative to the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from("rail-defence.toml")
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.grid.columns == 0 || self.grid.rows == 0 {
            bail!(
                "grid must have at least one cell, got {}x{}",
                self.grid.columns,
                self.grid.rows
            );
        }
        if !(self.grid.tile_length > 0.0) {
            bail!("tile_length must be positive, got {}", self.grid.tile_length);
        }
        if !(self.mover.speed > 0.0) {
            bail!("mover speed must be positive, got {}", self.mover.speed);
        }
        if !(self.mover.arrival_epsilon > 0.0) {
            bail!(
                "arrival_epsilon must be positive, got {}",
                self.mover.arrival_epsilon
            );
        }
        if self.mover.input_threshold < 0.0 {
            bail!(
                "input_threshold must not be negative, got {}",
                self.mover.input_threshold
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("defaults");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.grid.columns, 7);
        assert_eq!(config.economy.starting_resources, 10);
        assert_eq!(config.phases.countdown(), Duration::from_secs(3));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [grid]
            columns = 9
            blocked = [[3, 3], [4, 1]]

            [economy]
            cost_per_cell = 2
            "#,
        )
        .expect("valid config");

        assert_eq!(config.grid.columns, 9);
        assert_eq!(config.grid.rows, 7);
        assert_eq!(
            config.grid.blocked_cells(),
            vec![CellCoord::new(3, 3), CellCoord::new(4, 1)]
        );
        assert_eq!(config.economy.cost_per_cell, 2);
        assert_eq!(config.economy.starting_resources, 10);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = GameConfig::from_toml_str("[grid]\nwidth = 3\n").expect_err("unknown key");
        assert!(format!("{error:#}").contains("width"));
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        let error = GameConfig::from_toml_str("[grid]\ncolumns = 0\n").expect_err("empty grid");
        assert!(error.to_string().contains("at least one cell"));
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        assert!(GameConfig::from_toml_str("[mover]\nspeed = 0.0\n").is_err());
    }

    #[test]
    fn load_reads_file_and_reports_path_on_failure() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[phases]\ncountdown_ms = 500").expect("write config");

        let config = GameConfig::load(file.path()).expect("load");
        assert_eq!(config.phases.countdown_ms, 500);

        let missing = file.path().with_extension("missing");
        let error = GameConfig::load(&missing).expect_err("missing file");
        assert!(error.to_string().contains("failed to read config"));
    }
}

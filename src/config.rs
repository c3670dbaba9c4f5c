//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::SimError;
use crate::market::loader::parse_timestamp;
use crate::market::{MarketDataset, SyntheticMarket, load_joined};
use crate::sim::DEFAULT_UNIT_DISCHARGE_MWH;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Site identity.
    #[serde(default)]
    pub site: SiteConfig,
    /// Battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Dispatch policy parameters.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Input CSV paths; when absent the synthetic generator is used.
    #[serde(default)]
    pub data: DataConfig,
    /// Synthetic market generator parameters.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

/// Site identity. Opaque to the simulation core; labels output only.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name used in the run summary.
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "mantero".to_string(),
        }
    }
}

/// Battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (MWh, must be > 0).
    pub capacity_mwh: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self { capacity_mwh: 10.0 }
    }
}

/// Dispatch policy parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Minimum nodal price before discharge is allowed ($/MWh, any sign).
    pub discharge_price: f64,
    /// Fixed discharge request per hour (MWh, must be > 0).
    pub unit_discharge_mwh: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            discharge_price: 20.0,
            unit_discharge_mwh: DEFAULT_UNIT_DISCHARGE_MWH,
        }
    }
}

/// Input CSV paths. Both must be set to load real data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Grid series CSV (`timestamp,demand_mw,supply_mw,price_per_mwh`).
    pub grid_csv: Option<PathBuf>,
    /// Site series CSV (`timestamp,curtailment_mwh`).
    pub site_csv: Option<PathBuf>,
}

/// Synthetic market generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Number of hourly rows to generate (must be > 0).
    pub hours: usize,
    /// Random seed.
    pub seed: u64,
    /// First timestamp, in any accepted timestamp format.
    pub start: String,
    /// Mean system demand (MW).
    pub base_demand_mw: f64,
    /// Daily demand swing amplitude (MW).
    pub demand_amp_mw: f64,
    /// Mean system supply (MW).
    pub base_supply_mw: f64,
    /// Daily supply swing amplitude (MW).
    pub supply_amp_mw: f64,
    /// Noise standard deviation on demand and supply (MW).
    pub noise_std_mw: f64,
    /// Cap on per-hour curtailment (MWh).
    pub curtailment_cap_mwh: f64,
    /// Price level when demand and supply balance ($/MWh).
    pub base_price_per_mwh: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            hours: 24 * 365,
            seed: 42,
            start: "2022-01-01 00:00:00".to_string(),
            base_demand_mw: 100.0,
            demand_amp_mw: 25.0,
            base_supply_mw: 100.0,
            supply_amp_mw: 30.0,
            noise_std_mw: 3.0,
            curtailment_cap_mwh: 8.0,
            base_price_per_mwh: 22.0,
        }
    }
}

impl SyntheticConfig {
    /// Parses the configured start timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Timestamp`] if the string matches no accepted
    /// format.
    pub fn start_timestamp(&self) -> Result<NaiveDateTime, SimError> {
        parse_timestamp(&self.start)
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_mwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: the original 10 MWh battery with a
    /// $20/MWh discharge threshold over a synthetic year.
    pub fn baseline() -> Self {
        Self {
            site: SiteConfig::default(),
            battery: BatteryConfig::default(),
            dispatch: DispatchConfig::default(),
            data: DataConfig::default(),
            synthetic: SyntheticConfig::default(),
        }
    }

    /// Returns the deep-storage preset: a large battery discharging at a
    /// lower price floor.
    pub fn deep_storage() -> Self {
        Self {
            battery: BatteryConfig { capacity_mwh: 40.0 },
            dispatch: DispatchConfig {
                discharge_price: 15.0,
                ..DispatchConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the peaker preset: a small battery that waits for price
    /// spikes and discharges harder when they come.
    pub fn peaker() -> Self {
        Self {
            battery: BatteryConfig { capacity_mwh: 6.0 },
            dispatch: DispatchConfig {
                discharge_price: 45.0,
                unit_discharge_mwh: 2.0,
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "deep_storage", "peaker"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "deep_storage" => Ok(Self::deep_storage()),
            "peaker" => Ok(Self::peaker()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.site.name.is_empty() {
            errors.push(ConfigError {
                field: "site.name".into(),
                message: "must not be empty".into(),
            });
        }

        if !(self.battery.capacity_mwh > 0.0) {
            errors.push(ConfigError {
                field: "battery.capacity_mwh".into(),
                message: "must be > 0".into(),
            });
        }

        if !(self.dispatch.unit_discharge_mwh > 0.0) {
            errors.push(ConfigError {
                field: "dispatch.unit_discharge_mwh".into(),
                message: "must be > 0".into(),
            });
        }
        if !self.dispatch.discharge_price.is_finite() {
            errors.push(ConfigError {
                field: "dispatch.discharge_price".into(),
                message: "must be finite".into(),
            });
        }

        if self.data.grid_csv.is_some() != self.data.site_csv.is_some() {
            errors.push(ConfigError {
                field: "data".into(),
                message: "grid_csv and site_csv must be set together".into(),
            });
        }

        let syn = &self.synthetic;
        if self.data.grid_csv.is_none() {
            if syn.hours == 0 {
                errors.push(ConfigError {
                    field: "synthetic.hours".into(),
                    message: "must be > 0".into(),
                });
            }
            if syn.start_timestamp().is_err() {
                errors.push(ConfigError {
                    field: "synthetic.start".into(),
                    message: format!("unparseable timestamp \"{}\"", syn.start),
                });
            }
            if syn.noise_std_mw < 0.0 {
                errors.push(ConfigError {
                    field: "synthetic.noise_std_mw".into(),
                    message: "must be >= 0".into(),
                });
            }
            if syn.curtailment_cap_mwh < 0.0 {
                errors.push(ConfigError {
                    field: "synthetic.curtailment_cap_mwh".into(),
                    message: "must be >= 0".into(),
                });
            }
        }

        errors
    }

    /// Builds the input dataset this scenario describes: the CSV join when
    /// both paths are configured, the synthetic generator otherwise.
    ///
    /// # Errors
    ///
    /// Propagates loader failures ([`SimError`]); the synthetic path only
    /// fails on an unparseable start timestamp.
    pub fn build_dataset(&self) -> Result<MarketDataset, SimError> {
        match (&self.data.grid_csv, &self.data.site_csv) {
            (Some(grid), Some(site)) => load_joined(grid, site),
            _ => {
                let syn = &self.synthetic;
                let generator = SyntheticMarket {
                    hours: syn.hours,
                    start: syn.start_timestamp()?,
                    seed: syn.seed,
                    base_demand_mw: syn.base_demand_mw,
                    demand_amp_mw: syn.demand_amp_mw,
                    base_supply_mw: syn.base_supply_mw,
                    supply_amp_mw: syn.supply_amp_mw,
                    noise_std_mw: syn.noise_std_mw,
                    curtailment_cap_mwh: syn.curtailment_cap_mwh,
                    base_price_per_mwh: syn.base_price_per_mwh,
                };
                Ok(generator.generate())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[site]
name = "hillcrest"

[battery]
capacity_mwh = 25.0

[dispatch]
discharge_price = 32.5
unit_discharge_mwh = 1.5

[synthetic]
hours = 48
seed = 7
start = "2023-03-01 00:00:00"
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_mwh), Some(25.0));
        assert_eq!(cfg.as_ref().map(|c| c.synthetic.hours), Some(48));
        assert_eq!(cfg.as_ref().map(|c| &*c.site.name), Some("hillcrest"));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_mwh = 10.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[dispatch]
discharge_price = 30.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.dispatch.discharge_price), Some(30.0));
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_mwh), Some(10.0));
        assert_eq!(
            cfg.as_ref().map(|c| c.dispatch.unit_discharge_mwh),
            Some(1.0)
        );
    }

    #[test]
    fn validation_catches_zero_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.capacity_mwh = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_mwh"));
    }

    #[test]
    fn validation_catches_zero_unit_discharge() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.dispatch.unit_discharge_mwh = 0.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "dispatch.unit_discharge_mwh")
        );
    }

    #[test]
    fn validation_catches_lone_csv_path() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.data.grid_csv = Some(PathBuf::from("grid.csv"));
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "data"));
    }

    #[test]
    fn validation_catches_bad_synthetic_start() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.synthetic.start = "sometime last winter".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "synthetic.start"));
    }

    #[test]
    fn deep_storage_has_larger_battery() {
        let base = ScenarioConfig::baseline();
        let deep = ScenarioConfig::deep_storage();
        assert!(deep.battery.capacity_mwh > base.battery.capacity_mwh);
        assert!(deep.dispatch.discharge_price < base.dispatch.discharge_price);
    }

    #[test]
    fn baseline_builds_synthetic_dataset() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.synthetic.hours = 48;
        let ds = cfg.build_dataset().expect("synthetic build succeeds");
        assert_eq!(ds.len(), 48);
    }
}

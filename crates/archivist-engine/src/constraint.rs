//! Environmental gates for periodic runs

use std::fs;
use std::path::{Path, PathBuf};

/// Condition that must hold for a periodic run to start
///
/// Constraints decide whether a run starts, never how long it may take.
/// Manual runs ignore them.
pub trait RunConstraint: Send + Sync {
    /// Short description used in logs
    fn describe(&self) -> String;

    /// Whether a run may start now
    fn permits(&self) -> bool;
}

/// Constraint that always permits running
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl RunConstraint for Unconstrained {
    fn describe(&self) -> String {
        "unconstrained".to_string()
    }

    fn permits(&self) -> bool {
        true
    }
}

/// Refuse to run while the battery is low
///
/// Reads the Linux power-supply class directory. Running is permitted when
/// no battery is present, when any battery is charging or full, or when any
/// battery is above `min_percent`.
#[derive(Debug, Clone)]
pub struct BatteryNotLow {
    supply_root: PathBuf,
    min_percent: u8,
}

impl BatteryNotLow {
    /// Default location of power supply information
    pub const SUPPLY_ROOT: &'static str = "/sys/class/power_supply";

    /// Create a constraint reading the system power supplies
    pub fn new(min_percent: u8) -> Self {
        Self::with_supply_root(Self::SUPPLY_ROOT, min_percent)
    }

    /// Create a constraint reading power supplies from another directory
    pub fn with_supply_root<P: AsRef<Path>>(supply_root: P, min_percent: u8) -> Self {
        Self {
            supply_root: supply_root.as_ref().to_path_buf(),
            min_percent,
        }
    }

    fn batteries(&self) -> Vec<BatteryState> {
        let Ok(read_dir) = fs::read_dir(&self.supply_root) else {
            return Vec::new();
        };

        read_dir
            .filter_map(|item| item.ok())
            .filter_map(|item| BatteryState::read(&item.path()))
            .collect()
    }
}

impl RunConstraint for BatteryNotLow {
    fn describe(&self) -> String {
        format!("battery above {}%", self.min_percent)
    }

    fn permits(&self) -> bool {
        let batteries = self.batteries();
        if batteries.is_empty() {
            return true;
        }

        batteries
            .iter()
            .any(|battery| battery.charging || battery.capacity.is_some_and(|c| c > self.min_percent))
    }
}

#[derive(Debug)]
struct BatteryState {
    capacity: Option<u8>,
    charging: bool,
}

impl BatteryState {
    fn read(supply: &Path) -> Option<Self> {
        let kind = read_trimmed(&supply.join("type"))?;
        if kind != "Battery" {
            return None;
        }

        let capacity = read_trimmed(&supply.join("capacity")).and_then(|c| c.parse().ok());
        let charging = matches!(
            read_trimmed(&supply.join("status")).as_deref(),
            Some("Charging") | Some("Full")
        );

        Some(Self { capacity, charging })
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

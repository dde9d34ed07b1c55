//! Engine configuration.
//!
//! A [`SimConfig`] is threaded explicitly into every [`StateSpace`]; there
//! is no process-wide default that operators consult behind the caller's
//! back. It can be built in code or parsed from YAML:
//!
//! ```rust
//! use qsim_core::config::{Device, SimConfig};
//!
//! let cfg = SimConfig::from_yaml_str("device: parallel\nmax_qubits: 24\n").unwrap();
//! assert_eq!(cfg.device, Device::Parallel);
//! assert_eq!(cfg.max_qubits, 24);
//! ```
//!
//! [`StateSpace`]: crate::space::StateSpace

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::index::MAX_INDEX_QUBITS;

/// Where element-wise kernels execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Single thread on the calling thread.
    #[default]
    Serial,
    /// Rayon thread pool, split over basis-state rows.
    Parallel,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Kernel execution device.
    #[serde(default)]
    pub device: Device,

    /// Largest register width accepted by a state space.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

fn default_max_qubits() -> u32 {
    30
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            device: Device::default(),
            max_qubits: default_max_qubits(),
        }
    }
}

impl SimConfig {
    /// Serial configuration with the default qubit cap.
    pub fn serial() -> Self {
        Self::default()
    }

    /// Parallel configuration with the default qubit cap.
    pub fn parallel() -> Self {
        Self {
            device: Device::Parallel,
            ..Self::default()
        }
    }

    /// Override the execution device.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Override the qubit cap.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let cfg: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that the qubit cap is addressable by the index type.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_INDEX_QUBITS {
            return Err(CoreError::InvalidConfig(format!(
                "max_qubits must be in 1..={MAX_INDEX_QUBITS}, got {}",
                self.max_qubits
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.device, Device::Serial);
        assert_eq!(cfg.max_qubits, 30);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_yaml_fills_missing_fields() {
        let cfg = SimConfig::from_yaml_str("device: parallel\n").unwrap();
        assert_eq!(cfg, SimConfig::parallel());
    }

    #[test]
    fn test_yaml_rejects_unknown_device() {
        assert!(matches!(
            SimConfig::from_yaml_str("device: gpu\n"),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_cap_rejected() {
        assert!(matches!(
            SimConfig::from_yaml_str("max_qubits: 0\n"),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = SimConfig::serial()
            .with_device(Device::Parallel)
            .with_max_qubits(12);
        assert_eq!(cfg.device, Device::Parallel);
        assert_eq!(cfg.max_qubits, 12);
    }
}

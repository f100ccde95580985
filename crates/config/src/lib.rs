use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MemoryRange {
    pub base: u32,
    pub size: String, // e.g. "4KB"
}

/// Static description of the target node: memory geometry, the
/// comparator input and the debug pins.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BoardDescriptor {
    pub name: String,
    pub mcu: String, // e.g. "msp430fr5994"
    pub ram: MemoryRange,
    pub fram: MemoryRange,
    /// Pin carrying the external comparator output, e.g. "P4.1".
    pub comparator_pin: String,
    #[serde(default)]
    pub debug_leds: Vec<String>,
}

impl BoardDescriptor {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open board descriptor at {:?}", path.as_ref()))?;
        serde_yaml::from_reader(f).context("Failed to parse Board Descriptor")
    }
}

/// One phase of a scripted power trace: hold the supply in the given
/// state while the foreground task runs `steps` iterations.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PowerPhase {
    pub supply: bool,
    #[serde(default)]
    pub steps: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioLimits {
    pub max_cycles: u64,
}

/// Where the node is expected to end up after the trace has played out.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EndState {
    Resumed,
    ArmedForHibernate,
    ArmedForRestore,
    PoweredDown,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct MinProgressAssertion {
    pub min_progress: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct EndStateAssertion {
    pub expected_end_state: EndState,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct MaxFaultFlashesAssertion {
    pub max_fault_flashes: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum ScenarioAssertion {
    MinProgress(MinProgressAssertion),
    ExpectedEndState(EndStateAssertion),
    MaxFaultFlashes(MaxFaultFlashesAssertion),
}

/// A scripted intermittency scenario: a power trace plus assertions on
/// the surviving forward progress.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioScript {
    pub schema_version: String,
    pub trace: Vec<PowerPhase>,
    pub limits: ScenarioLimits,
    #[serde(default)]
    pub assertions: Vec<ScenarioAssertion>,
}

impl ScenarioScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open scenario script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse Scenario Script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        if self.trace.is_empty() {
            anyhow::bail!("Scenario trace cannot be empty");
        }

        if self.limits.max_cycles == 0 {
            anyhow::bail!("Limit 'max_cycles' must be greater than zero");
        }

        let power_cycles = self.trace.iter().filter(|p| !p.supply).count() as u64;
        if power_cycles > self.limits.max_cycles {
            anyhow::bail!(
                "Trace contains {} power-down phases, limit is {}",
                power_cycles,
                self.limits.max_cycles
            );
        }

        Ok(())
    }
}

pub fn parse_size(size_str: &str) -> Result<u64> {
    use human_size::{Byte, Size, SpecificSize};
    let s: Size = size_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid size format: {}", e))?;
    let bytes: SpecificSize<Byte> = s.into();
    Ok(bytes.value() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_scenario() {
        let yaml = r#"
schema_version: "1.0"
trace:
  - supply: true
    steps: 10
  - supply: false
  - supply: true
    steps: 10
limits:
  max_cycles: 4
assertions:
  - min_progress: 20
  - expected_end_state: resumed
"#;
        let script: ScenarioScript = serde_yaml::from_str(yaml).unwrap();
        assert!(script.validate().is_ok());
        assert_eq!(script.trace.len(), 3);
        assert_eq!(script.assertions.len(), 2);
    }

    #[test]
    fn test_invalid_version() {
        let yaml = r#"
schema_version: "2.0"
trace:
  - supply: true
limits:
  max_cycles: 1
"#;
        let script: ScenarioScript = serde_yaml::from_str(yaml).unwrap();
        let err = script.validate().unwrap_err();
        assert!(err.to_string().contains("Unsupported schema_version"));
    }

    #[test]
    fn test_empty_trace() {
        let yaml = r#"
schema_version: "1.0"
trace: []
limits:
  max_cycles: 1
"#;
        let script: ScenarioScript = serde_yaml::from_str(yaml).unwrap();
        let err = script.validate().unwrap_err();
        assert!(err.to_string().contains("trace"));
    }

    #[test]
    fn test_too_many_power_cycles() {
        let yaml = r#"
schema_version: "1.0"
trace:
  - supply: true
  - supply: false
  - supply: true
  - supply: false
limits:
  max_cycles: 1
"#;
        let script: ScenarioScript = serde_yaml::from_str(yaml).unwrap();
        let err = script.validate().unwrap_err();
        assert!(err.to_string().contains("power-down"));
    }

    #[test]
    fn test_board_descriptor() {
        let yaml = r#"
name: "launchpad"
mcu: "msp430fr5994"
ram:
  base: 0x1C00
  size: "4KB"
fram:
  base: 0x6000
  size: "6KB"
comparator_pin: "P4.1"
debug_leds: ["P1.0", "P8.0"]
"#;
        let board: BoardDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(board.mcu, "msp430fr5994");
        assert_eq!(parse_size(&board.ram.size).unwrap(), 4000);
    }

    #[test]
    fn test_parse_size_kib() {
        assert_eq!(parse_size("4KiB").unwrap(), 4096);
    }
}

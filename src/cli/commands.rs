//! CLI command implementations
//!
//! Commands are thin: they load the configuration and the instance, hand off
//! to the advisor and print a human-readable report. Structured progress goes
//! through the JSON-lines logger.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::advisor::IndexAdvisor;
use crate::compiler::CompilerConfig;
use crate::decoder::{Decoded, DEFAULT_RESULT_LOG};
use crate::interchange::{export_model, import_model, import_samples};
use crate::solver::{SolverConfig, SolverMode};
use crate::workload::{NormalizationConfig, ProblemInstance, RawInstance};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Configuration file structure
///
/// Every section is optional:
///
/// ```json
/// {
///   "compiler": {"objective_bound": 500, "exclusion_penalty": 100.0},
///   "solver": {"mode": "anneal", "num_reads": 100, "seed": 7},
///   "normalization": {"cost_factor": 80000000, "benefit_factor": 100000},
///   "output_log": "output.log"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub solver: SolverConfig,

    #[serde(default)]
    pub normalization: NormalizationConfig,

    /// Result log of `solve` and `decode`
    #[serde(default = "default_output_log")]
    pub output_log: PathBuf,
}

fn default_output_log() -> PathBuf {
    PathBuf::from(DEFAULT_RESULT_LOG)
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// `path` when given, built-in defaults otherwise
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        self.compiler.validate()?;
        self.normalization.validate()?;
        self.solver
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))?;
        if self.output_log.as_os_str().is_empty() {
            return Err(CliError::config_error("output_log must not be empty"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compiler: CompilerConfig::default(),
            solver: SolverConfig::default(),
            normalization: NormalizationConfig::default(),
            output_log: default_output_log(),
        }
    }
}

/// Read estimator output, optionally overriding its storage budget
pub fn load_instance(path: &Path, storage_budget: Option<f64>) -> CliResult<RawInstance> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read instance: {}", e)))?;
    let mut raw: RawInstance = serde_json::from_str(&content)?;
    if let Some(budget) = storage_budget {
        raw.storage_budget = budget;
    }
    Ok(raw)
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Compile {
            instance,
            config,
            storage_budget,
            out,
        } => compile(&instance, config.as_deref(), storage_budget, &out),
        Command::Solve {
            instance,
            config,
            storage_budget,
            exact,
            num_reads,
            seed,
        } => {
            let mut config = Config::resolve(config.as_deref())?;
            if exact {
                config.solver.mode = SolverMode::Exact;
            }
            if let Some(num_reads) = num_reads {
                config.solver.num_reads = num_reads;
            }
            if seed.is_some() {
                config.solver.seed = seed;
            }
            solve(&instance, &config, storage_budget)
        }
        Command::Decode {
            instance,
            samples,
            config,
            storage_budget,
            qubo,
        } => {
            let config = Config::resolve(config.as_deref())?;
            decode(&instance, &samples, &config, storage_budget, qubo.as_deref())
        }
    }
}

/// Normalize and compile, then export the QUBO (no solve)
pub fn compile(
    instance_path: &Path,
    config_path: Option<&Path>,
    storage_budget: Option<f64>,
    out: &Path,
) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    let (advisor, instance) = prepare(instance_path, &config, storage_budget)?;

    let compiled = advisor.compile(&instance)?;
    let document = export_model(&compiled.model, out)?;

    println!("QUBO written to {}", out.display());
    println!("  variables:    {}", compiled.layout.len());
    println!("  auxiliaries:  {}", compiled.num_auxiliaries());
    println!("  interactions: {}", compiled.model.num_interactions());
    println!("  digest:       {}", document.digest);
    Ok(())
}

/// Full pipeline: compile, sample, decode, write the result log
pub fn solve(
    instance_path: &Path,
    config: &Config,
    storage_budget: Option<f64>,
) -> CliResult<()> {
    config.validate()?;
    let (advisor, instance) = prepare(instance_path, config, storage_budget)?;
    let recommendation = advisor.run(&instance)?;
    print_report(&instance, &recommendation.decoded);
    Ok(())
}

/// Score and decode externally produced samples
pub fn decode(
    instance_path: &Path,
    samples_path: &Path,
    config: &Config,
    storage_budget: Option<f64>,
    qubo_path: Option<&Path>,
) -> CliResult<()> {
    let (advisor, instance) = prepare(instance_path, config, storage_budget)?;
    let model = match qubo_path {
        Some(path) => import_model(path)?,
        None => advisor.compile(&instance)?.model,
    };
    let samples = import_samples(samples_path, &model)?;
    let decoded = advisor.decode(&instance, &samples)?;
    print_report(&instance, &decoded);
    Ok(())
}

fn prepare(
    instance_path: &Path,
    config: &Config,
    storage_budget: Option<f64>,
) -> CliResult<(IndexAdvisor, ProblemInstance)> {
    let raw = load_instance(instance_path, storage_budget)?;
    let advisor = IndexAdvisor::new(config.compiler.clone(), config.solver.clone())?
        .with_result_log(config.output_log.clone());
    let instance = advisor.normalize(&raw, &config.normalization)?;
    Ok((advisor, instance))
}

/// Per-replica indexes, benchmark index string and routing table
pub fn render_report(instance: &ProblemInstance, decoded: &Decoded) -> String {
    let mut out = String::new();
    out.push_str(&format!("energy {}\n", decoded.energy));
    for (r, selected) in decoded.indexes.iter().enumerate() {
        out.push_str(&format!("- Replica {}\n", r));
        for i in selected {
            out.push_str(&format!("\t{}\n", instance.candidates()[*i]));
        }
    }
    for warning in &decoded.warnings {
        out.push_str(&format!("!! warn: {}\n", warning));
    }
    out.push_str("- Index output for benchmarking module\n");
    out.push_str(&decoded.index_string(instance));
    out.push('\n');
    out.push_str("- Routing table\n");
    out.push_str(&decoded.routing_table());
    out.push('\n');
    out
}

fn print_report(instance: &ProblemInstance, decoded: &Decoded) {
    print!("{}", render_report(instance, decoded));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output_log, PathBuf::from("output.log"));
    }

    #[test]
    fn test_load_rejects_invalid_compiler_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"compiler": {"objective_bound": -1}}"#).unwrap();
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "QUBO_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_storage_budget_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instance.json");
        fs::write(
            &path,
            r#"{"candidates": [], "n_templates": 0, "n_replicas": 1,
                "benefits": [], "costs": [], "baseline": [], "storage_budget": 1.0}"#,
        )
        .unwrap();
        let raw = load_instance(&path, Some(160_000_000.0)).unwrap();
        assert_eq!(raw.storage_budget, 160_000_000.0);
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing_subscriber::fmt::SubscriberBuilder;

use fracnet::calibrate::{CalibrateParams, Calibrator, Histogram, TargetDistribution};
use fracnet::gen::{generate_population, FractureGenParams};
use fracnet::geom::{Domain, Tol};
use fracnet::intersect::{sweep, verify_network, Network};
use fracnet::random::SeededUniform;
use fracnet::scanline::generate_scanlines;
use fracnet::Point3;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Discrete fracture network pipeline runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Full pipeline: generate, intersect, calibrate, write artifacts
    Run {
        /// JSON run configuration
        #[arg(long)]
        config: String,
        /// Output directory for artifacts and provenance sidecars
        #[arg(long, default_value = "out")]
        out_dir: String,
        /// Override the seed from the config
        #[arg(long)]
        seed: Option<u64>,
        /// Re-check the final network through the independent membership test
        #[arg(long)]
        verify: bool,
    },
    /// Generate a population and write the intersection network only
    Intersect {
        #[arg(long)]
        config: String,
        #[arg(long, default_value = "out")]
        out_dir: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Deserialize)]
struct Config {
    seed: u64,
    domain: DomainConfig,
    fractures: FracturesConfig,
    scanlines: ScanlinesConfig,
    calibration: CalibrationConfig,
}

#[derive(Deserialize)]
struct DomainConfig {
    min: [f64; 3],
    max: [f64; 3],
}

impl DomainConfig {
    fn to_domain(&self) -> Result<Domain> {
        let domain = Domain::new(
            Point3::new(self.min[0], self.min[1], self.min[2]),
            Point3::new(self.max[0], self.max[1], self.max[2]),
        );
        anyhow::ensure!(domain.is_valid(), "domain max must strictly dominate min");
        Ok(domain)
    }
}

#[derive(Deserialize)]
struct FracturesConfig {
    count: usize,
    side_min: f64,
    side_max: f64,
    aperture: f64,
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    256
}

impl FracturesConfig {
    fn to_params(&self) -> FractureGenParams {
        FractureGenParams {
            count: self.count,
            side_min: self.side_min,
            side_max: self.side_max,
            aperture: self.aperture,
            max_attempts: self.max_attempts,
        }
    }
}

#[derive(Deserialize)]
struct ScanlinesConfig {
    per_plane: usize,
    plane_count: usize,
}

#[derive(Deserialize)]
struct CalibrationConfig {
    min_distance: f64,
    max_distance: f64,
    classes: usize,
    start_temperature: f64,
    cooling: f64,
    temp_steps: usize,
    steps_per_temp: usize,
    mcmc_iterations: usize,
    distribution: String,
    #[serde(default)]
    lambda: Option<f64>,
    #[serde(default)]
    mu: Option<f64>,
    #[serde(default)]
    sigma: Option<f64>,
    #[serde(default)]
    exponent: Option<f64>,
}

impl CalibrationConfig {
    /// Map the config vocabulary onto the library's target enum. Unknown
    /// kinds fail here; known-but-unimplemented kinds fail later inside
    /// the calibrator with a typed error.
    fn target(&self) -> Result<TargetDistribution> {
        match self.distribution.as_str() {
            "negative-exponential" => {
                let lambda = self.lambda.context("negative-exponential needs `lambda`")?;
                Ok(TargetDistribution::NegativeExponential { lambda })
            }
            "log-normal" => {
                let mu = self.mu.context("log-normal needs `mu`")?;
                let sigma = self.sigma.context("log-normal needs `sigma`")?;
                Ok(TargetDistribution::LogNormal { mu, sigma })
            }
            "power-law" => {
                let exponent = self.exponent.context("power-law needs `exponent`")?;
                Ok(TargetDistribution::PowerLaw { exponent })
            }
            other => anyhow::bail!("unknown target distribution `{other}`"),
        }
    }

    fn to_params(&self) -> Result<CalibrateParams> {
        Ok(CalibrateParams {
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            classes: self.classes,
            start_temperature: self.start_temperature,
            cooling: self.cooling,
            temp_steps: self.temp_steps,
            steps_per_temp: self.steps_per_temp,
            mcmc_iterations: self.mcmc_iterations,
            target: self.target()?,
        })
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run {
            config,
            out_dir,
            seed,
            verify,
        } => run(config, out_dir, seed, verify),
        Action::Intersect {
            config,
            out_dir,
            seed,
        } => intersect_only(config, out_dir, seed),
    }
}

fn run(config_path: String, out_dir: String, seed_override: Option<u64>, verify: bool) -> Result<()> {
    let config = load_config(&config_path)?;
    let seed = seed_override.unwrap_or(config.seed);
    let domain = config.domain.to_domain()?;
    let tol = Tol::default();
    let mut src = SeededUniform::new(seed);

    let mut fractures = generate_population(&config.fractures.to_params(), &domain, &mut src)?;
    tracing::info!(seed, count = fractures.len(), "generated fracture population");

    let initial = sweep(&fractures, &tol);
    tracing::info!(
        edges = initial.edges.len(),
        vertices = initial.vertices.len(),
        "initial intersection network"
    );

    let mut scanlines = generate_scanlines(
        config.scanlines.per_plane,
        config.scanlines.plane_count,
        &domain,
        &mut src,
    );
    tracing::info!(scanlines = scanlines.len(), "scanline layout ready");

    let params = config.calibration.to_params()?;
    let mut calibrator =
        Calibrator::new(&mut fractures, &mut scanlines, &domain, params, tol, &mut src)?;
    tracing::info!(objective = calibrator.objective(), "baseline objective");
    let sa = calibrator.anneal();
    tracing::info!(
        iterations = sa.iterations,
        accepted = sa.accepted,
        objective = calibrator.objective(),
        "annealing finished"
    );
    let mc = calibrator.mcmc();
    tracing::info!(
        iterations = mc.iterations,
        accepted = mc.accepted,
        objective = calibrator.objective(),
        "mcmc finished"
    );

    let histogram_doc = histogram_json(calibrator.real_histogram(), calibrator.dream_histogram());
    let trace_doc = serde_json::json!({ "objective": calibrator.trace() });
    let objective = calibrator.objective();

    // The calibrated positions invalidate the initial network; rebuild it.
    let network = sweep(&fractures, &tol);
    tracing::info!(
        edges = network.edges.len(),
        vertices = network.vertices.len(),
        "final intersection network"
    );
    if verify {
        verify_network(&network, &fractures, &tol)?;
        tracing::info!("network verification passed");
    }

    let out = Path::new(&out_dir);
    std::fs::create_dir_all(out)?;
    let params_doc = serde_json::json!({ "seed": seed, "config": config_path });
    write_artifact(&out.join("network.json"), &network_json(&network), &params_doc)?;
    write_artifact(&out.join("histogram.json"), &histogram_doc, &params_doc)?;
    write_artifact(&out.join("trace.json"), &trace_doc, &params_doc)?;
    tracing::info!(objective, out_dir, "run complete");
    Ok(())
}

fn intersect_only(config_path: String, out_dir: String, seed_override: Option<u64>) -> Result<()> {
    let config = load_config(&config_path)?;
    let seed = seed_override.unwrap_or(config.seed);
    let domain = config.domain.to_domain()?;
    let tol = Tol::default();
    let mut src = SeededUniform::new(seed);

    let fractures = generate_population(&config.fractures.to_params(), &domain, &mut src)?;
    let network = sweep(&fractures, &tol);
    tracing::info!(
        seed,
        edges = network.edges.len(),
        vertices = network.vertices.len(),
        "intersection sweep complete"
    );

    let out = Path::new(&out_dir);
    std::fs::create_dir_all(out)?;
    let params_doc = serde_json::json!({ "seed": seed, "config": config_path });
    write_artifact(&out.join("network.json"), &network_json(&network), &params_doc)?;
    Ok(())
}

fn load_config(path: &str) -> Result<Config> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))
}

fn network_json(net: &Network) -> Value {
    serde_json::json!({
        "edges": net
            .edges
            .iter()
            .map(|e| serde_json::json!({
                "a": [e.a.x, e.a.y, e.a.z],
                "b": [e.b.x, e.b.y, e.b.z],
                "fractures": [e.fractures.0, e.fractures.1],
                "length": e.length(),
            }))
            .collect::<Vec<_>>(),
        "vertices": net
            .vertices
            .iter()
            .map(|v| serde_json::json!({
                "point": [v.point.x, v.point.y, v.point.z],
                "index": v.index,
            }))
            .collect::<Vec<_>>(),
    })
}

fn histogram_json(real: &Histogram, dream: &Histogram) -> Value {
    let bins: Vec<Value> = real
        .classes()
        .iter()
        .zip(dream.classes())
        .map(|(r, d)| {
            serde_json::json!({
                "lower": r.lower,
                "upper": r.upper,
                "real_abs": r.abs_frequency,
                "real_pct": r.perc_frequency,
                "dream_pct": d.perc_frequency,
            })
        })
        .collect();
    serde_json::json!({ "total": real.total(), "bins": bins })
}

/// Write a JSON artifact plus a `<stem>.provenance.json` sidecar beside it.
fn write_artifact(path: &Path, doc: &Value, params: &Value) -> Result<()> {
    std::fs::write(path, serde_json::to_vec_pretty(doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    let provenance = serde_json::json!({
        "code_rev": current_git_rev(),
        "crate_version": fracnet::VERSION,
        "params": params,
        "outputs": [path.display().to_string()],
    });
    let sidecar = provenance_path(path);
    std::fs::write(&sidecar, serde_json::to_vec_pretty(&provenance)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(())
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time commit if baked in, then the environment, then `git` itself.
fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT") {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

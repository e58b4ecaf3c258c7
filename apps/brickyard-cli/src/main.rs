mod script;
mod session;

use anyhow::{Context, bail};
use brickyard_assets::{FitMode, PropLoader, load_document};
use brickyard_hud::{DebugTextRenderer, Renderer};
use brickyard_input::KeyBindings;
use brickyard_kernel::GameConfig;
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use script::Script;
use session::Session;

#[derive(Parser)]
#[command(name = "brickyard-cli", about = "Headless driver for the brick yard game")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, rules and key bindings
    Info,
    /// Validate a config file, or print the default one
    Config {
        /// YAML file to check
        path: Option<PathBuf>,
    },
    /// Play a key script and print the HUD as it changes
    Play {
        /// Whitespace-separated tokens: `e`, `w*40` (hold 40 ticks), `wait*30`
        #[arg(short, long)]
        script: String,
        /// Game config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Key bindings (YAML)
        #[arg(short, long)]
        bindings: Option<PathBuf>,
        /// Model prop placed in the yard, as `path@x,z` (repeatable)
        #[arg(long)]
        prop: Vec<PropArg>,
        /// Print the scene after the script
        #[arg(long)]
        dump: bool,
    },
    /// Print a model's bounds and the fit that normalises it
    InspectModel {
        path: PathBuf,
        /// Fit to this height instead of the longest side
        #[arg(long)]
        height: Option<f32>,
        /// Longest side after fitting
        #[arg(long, default_value = "2.0")]
        longest: f32,
    },
}

/// `path@x,z`
#[derive(Debug, Clone)]
struct PropArg {
    path: PathBuf,
    anchor: Vec3,
}

impl FromStr for PropArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let Some((path, at)) = s.rsplit_once('@') else {
            bail!("expected path@x,z, got {s:?}");
        };
        let Some((x, z)) = at.split_once(',') else {
            bail!("expected x,z after '@', got {at:?}");
        };
        let x: f32 = x.trim().parse().context("prop x")?;
        let z: f32 = z.trim().parse().context("prop z")?;
        Ok(Self {
            path: PathBuf::from(path),
            anchor: Vec3::new(x, 0.0, z),
        })
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    match path {
        Some(p) => GameConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(GameConfig::default()),
    }
}

fn load_bindings(path: Option<&PathBuf>) -> anyhow::Result<KeyBindings> {
    let Some(p) = path else {
        return Ok(KeyBindings::default());
    };
    let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", p.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = GameConfig::default();
            println!("brickyard-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "rules: target={} batch={} capacity={} radius={}",
                config.rules.target,
                config.rules.batch_size,
                config.rules.capacity,
                config.rules.interaction_radius
            );
            println!("bindings:");
            for (key, action) in KeyBindings::default().iter() {
                println!("  {key:<10} {action:?}");
            }
        }
        Commands::Config { path } => match path {
            Some(p) => {
                load_config(Some(&p))?;
                println!("{}: OK", p.display());
            }
            None => print!("{}", GameConfig::default().to_yaml_string()?),
        },
        Commands::Play {
            script,
            config,
            bindings,
            prop,
            dump,
        } => {
            let script: Script = script.parse()?;
            let mut session = Session::new(
                load_config(config.as_ref())?,
                load_bindings(bindings.as_ref())?,
            )?;
            let loader = PropLoader::default();
            for p in &prop {
                if let Some(loaded) = loader.load_or_skip(&p.path, p.anchor) {
                    session.add_prop(&loaded);
                }
            }

            let mut last = session.hud();
            println!("[tick {:>5}] {}", session.world().tick(), last.status);
            println!("{}", last.hint);
            for step in script.steps {
                session.apply(step);
                let hud = session.hud();
                if hud != last {
                    println!("[tick {:>5}] {}", session.world().tick(), hud.status);
                    if hud.hint != last.hint {
                        println!("{}", hud.hint);
                    }
                    last = hud;
                }
            }
            if dump {
                print!("{}", DebugTextRenderer::new().render(session.world(), &session.view()));
            }
        }
        Commands::InspectModel {
            path,
            height,
            longest,
        } => {
            let doc = load_document(&path).with_context(|| format!("loading {}", path.display()))?;
            let bounds = doc.bounds()?;
            let mode = match height {
                Some(h) => FitMode::Height(h),
                None => FitMode::Longest(longest),
            };
            let fit = mode.fit(&bounds);
            let fitted = fit.apply_to_bounds(&bounds);
            println!(
                "{}: {} nodes, {} meshes",
                path.display(),
                doc.node_count(),
                doc.mesh_count()
            );
            println!("bounds: min={:?} max={:?} size={:?}", bounds.min, bounds.max, bounds.size());
            println!("fit ({mode:?}): scale={} translation={:?}", fit.scale, fit.translation);
            println!("fitted: min={:?} max={:?}", fitted.min, fitted.max);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prop_arg_parses() {
        let p: PropArg = "models/yeti.gltf@0,4.5".parse().unwrap();
        assert_eq!(p.path, PathBuf::from("models/yeti.gltf"));
        assert_eq!(p.anchor, Vec3::new(0.0, 0.0, 4.5));
        assert!("yeti.gltf".parse::<PropArg>().is_err());
        assert!("yeti.gltf@1".parse::<PropArg>().is_err());
        assert!("yeti.gltf@a,b".parse::<PropArg>().is_err());
    }

    #[test]
    fn bindings_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.yaml");
        std::fs::write(&path, "table:\n  E: Restart\n").unwrap();
        let b = load_bindings(Some(&path)).unwrap();
        assert_eq!(b.action_for(brickyard_input::Key::E), Some(brickyard_input::Action::Restart));
        assert_eq!(b.action_for(brickyard_input::Key::W), None);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.yaml"))).is_err());
        assert!(load_config(None).is_ok());
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use std::str::FromStr;
use topomap_core::{
    CommentsData, CoordinateMode, EdgesGeometry, LayoutEngine, Scene, SceneConfig, SceneInput,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(topomap_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<topomap_core::Error> for CliError {
    fn from(value: topomap_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy)]
struct ModeArg(CoordinateMode);

impl FromStr for ModeArg {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" | "logic" => Ok(Self(CoordinateMode::Cartesian)),
            "geographic" | "geo" => Ok(Self(CoordinateMode::Geographic)),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    config: Option<String>,
    mode: Option<CoordinateMode>,
    pretty: bool,
    layout: bool,
}

/// Input document: optional configuration plus the rows of one update cycle.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    config: Option<Value>,
    #[serde(flatten)]
    input: SceneInput,
}

#[derive(Serialize)]
struct Output<'a> {
    version: u64,
    #[serde(flatten)]
    geometry: &'a EdgesGeometry,
    comments: &'a CommentsData,
}

fn usage() -> &'static str {
    "topomap-cli\n\
\n\
USAGE:\n\
  topomap-cli [--pretty] [--layout] [--mode cartesian|geographic] [--config <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON document {\"config\"?, \"nodes\": [...], \"edges\": [...]}.\n\
  - --config replaces the document's config; --mode and --layout override it.\n\
  - Output is {\"version\", \"lines\", \"arcs\", \"comments\"}; features are bucketed by namespace.\n\
  - Diagnostics go to stderr; set RUST_LOG (default: warn) to see more.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--layout" => args.layout = true,
            "--mode" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let mode = mode
                    .parse::<ModeArg>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.mode = Some(mode.0);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn effective_config(args: &Args, doc_config: Option<Value>) -> Result<SceneConfig, CliError> {
    let mut config = match (&args.config, doc_config) {
        (Some(path), _) => SceneConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        (None, Some(value)) => SceneConfig::from_value(value)?,
        (None, None) => SceneConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if args.layout {
        config.layout.enabled = true;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let doc: Document = serde_json::from_str(&text)?;
    let config = effective_config(&args, doc.config)?;

    let algorithm = config.layout.algorithm();
    let engine: Option<&dyn LayoutEngine> = config
        .layout
        .enabled
        .then_some(&algorithm as &dyn LayoutEngine);

    let mut scene = Scene::new(config);
    let geometry = scene.update(&doc.input, engine)?;
    tracing::info!(
        version = scene.version(),
        lines = geometry.line_count(),
        "update complete"
    );

    let out = Output {
        version: scene.version(),
        geometry: &geometry,
        comments: scene.comments(),
    };
    write_json(&out, args.pretty)
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

use canopy::{CanopyConfig, Viewer};
use futures::executor::block_on;
use serde::Serialize;
use std::io::Read;
use tracing::level_filters::LevelFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Canopy(canopy::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Canopy(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<canopy::Error> for CliError {
    fn from(value: canopy::Error) -> Self {
        Self::Canopy(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Stats,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    root: Option<String>,
    radius_factor: Option<f64>,
    angle_factor: Option<f64>,
    config: Option<String>,
    verbosity: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOut<'a> {
    name: Option<&'a str>,
    root: &'a str,
    nodes: usize,
    reachable: usize,
    max_fan_out: usize,
    extent: f64,
}

fn usage() -> &'static str {
    "canopy-cli\n\
\n\
USAGE:\n\
  canopy-cli [layout] [--pretty] [--root <id>] [--radius-factor <f>] [--angle-factor <f>] [--config <json>] [-v|--verbose] [<path>|-]\n\
  canopy-cli stats [--pretty] [--root <id>] [--config <json>] [-v|--verbose] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - layout prints the visible scene (node positions, edges, camera pose) as JSON.\n\
  - --config reads a JSON file with optional `layout` and `camera` sections.\n\
  - Repeat -v for more log output on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "stats" => args.command = Command::Stats,
            "--pretty" => args.pretty = true,
            "-v" | "--verbose" => args.verbosity = args.verbosity.saturating_add(1),
            "--root" => {
                let Some(root) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.root = Some(root.clone());
            }
            "--radius-factor" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.radius_factor = Some(parse_factor(v)?);
            }
            "--angle-factor" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.angle_factor = Some(parse_factor(v)?);
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
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

fn parse_factor(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(CliError::Usage(usage()))
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_viewer(input: Option<&str>, config: &CanopyConfig) -> Result<Viewer, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(canopy::open_str(&buf, config)?)
        }
        // Loading goes through the background loader, the same path an interactive shell uses.
        Some(path) => Ok(block_on(canopy::open(path, config))?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    use std::io::Write;
    writeln!(out)?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => CanopyConfig::load(path)?,
        None => CanopyConfig::default(),
    };
    if let Some(v) = args.radius_factor {
        config.layout.radius_factor = v;
    }
    if let Some(v) = args.angle_factor {
        config.layout.angle_factor = v;
    }

    let mut viewer = load_viewer(args.input.as_deref(), &config)?;
    if let Some(root) = args.root.as_deref() {
        viewer.set_root_by_id(root)?;
        viewer.frame_camera();
    }
    tracing::info!(
        root = viewer.tree().id(viewer.root()),
        visible = viewer.visible_nodes().count(),
        extent = viewer.last_layout().max_radius,
        "laid out tree"
    );

    match args.command {
        Command::Layout => write_json(&viewer.snapshot(), args.pretty),
        Command::Stats => {
            let tree = viewer.tree();
            let stats = StatsOut {
                name: tree.name(),
                root: tree.id(viewer.root()),
                nodes: tree.len(),
                reachable: tree.subtree_size(viewer.root()),
                max_fan_out: tree.max_fan_out(),
                extent: viewer.last_layout().max_radius,
            };
            write_json(&stats, args.pretty)
        }
    }
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
    init_logging(args.verbosity);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::str::FromStr;
use tracklets::graphlib::Graph;
use tracklets::{
    EdgeList, ExtractOptions, NodeAttrs, OrderOptions, Placement, SelfLoopPolicy, TrackletId,
};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Tracklets(tracklets::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Tracklets(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<tracklets::Error> for CliError {
    fn from(value: tracklets::Error) -> Self {
        Self::Tracklets(value)
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
    Extract,
    Order,
}

struct PlacementArg(Placement);

impl FromStr for PlacementArg {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parent-first" => Ok(Self(Placement::ParentFirst)),
            "centered" | "centred" => Ok(Self(Placement::Centered)),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    verbose: bool,
    ignore_self_loops: bool,
    key: Option<String>,
    placement: Option<Placement>,
}

/// Options file accepted by `--config`. Command-line flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CliConfig {
    extract: ExtractOptions,
    order: OrderOptions,
}

/// Node ids as they appear in JSON input: integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
enum NodeKey {
    Int(i64),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderInput {
    Edges(Vec<Vec<NodeKey>>),
    Graph(GraphInput),
}

#[derive(Deserialize)]
struct GraphInput {
    nodes: Vec<NodeInput>,
    #[serde(default)]
    edges: Vec<(NodeKey, NodeKey)>,
}

#[derive(Deserialize)]
struct NodeInput {
    id: NodeKey,
    #[serde(flatten)]
    attrs: NodeAttrs,
}

#[derive(Serialize)]
struct ExtractOut<'a> {
    nodes: Vec<(&'a NodeKey, TrackletId)>,
    parents: &'a BTreeMap<TrackletId, Vec<TrackletId>>,
}

fn usage() -> &'static str {
    "tracklets-cli\n\
\n\
USAGE:\n\
  tracklets-cli [extract] [--pretty] [--ignore-self-loops] [--config <path>] [<path>|-]\n\
  tracklets-cli order [--pretty] [--key <name>] [--placement parent-first|centered] [--ignore-self-loops] [--config <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - extract reads a JSON array of [u, v] edges and prints {\"nodes\": [[node, tracklet], ...], \"parents\": {tracklet: [parent, ...]}}.\n\
  - order reads either an edge array (tracklets are extracted first) or {\"nodes\": [{\"id\": .., \"<key>\": ..}], \"edges\": [[u, v], ...]}.\n\
  - --config reads {\"extract\": {\"self_loops\": \"reject\"|\"ignore\"}, \"order\": {\"tracklet_id_key\": .., \"placement\": ..}}.\n\
  - --verbose (or RUST_LOG) enables debug logging on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "extract" => args.command = Command::Extract,
            "order" => args.command = Command::Order,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--ignore-self-loops" => args.ignore_self_loops = true,
            "--key" => {
                let Some(key) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if key.trim().is_empty() {
                    return Err(CliError::Usage(usage()));
                }
                args.key = Some(key.clone());
            }
            "--placement" => {
                let Some(placement) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let PlacementArg(placement) = placement
                    .parse::<PlacementArg>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.placement = Some(placement);
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

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
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

fn load_config(args: &Args) -> Result<CliConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<CliConfig>(&std::fs::read_to_string(path)?)?,
        None => CliConfig::default(),
    };
    if args.ignore_self_loops {
        config.extract.self_loops = SelfLoopPolicy::Ignore;
    }
    if let Some(key) = &args.key {
        config.order.tracklet_id_key = key.clone();
    }
    if let Some(placement) = args.placement {
        config.order.placement = placement;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let text = read_input(args.input.as_deref())?;
    tracing::debug!(bytes = text.len(), command = ?args.command, "read input");

    match args.command {
        Command::Extract => {
            let rows: Vec<Vec<NodeKey>> = serde_json::from_str(&text)?;
            let edges = EdgeList::from_rows(rows)?;
            let t = tracklets::extract_tracklets_with(edges.as_slice(), &config.extract)?;
            let out = ExtractOut {
                nodes: t
                    .node_to_tracklet()
                    .iter()
                    .map(|(node, &tid)| (node, tid))
                    .collect(),
                parents: t.parent_graph(),
            };
            write_json(&out, args.pretty)
        }
        Command::Order => {
            let order = match serde_json::from_str::<OrderInput>(&text)? {
                OrderInput::Edges(rows) => {
                    let edges = EdgeList::from_rows(rows)?;
                    let t = tracklets::extract_tracklets_with(edges.as_slice(), &config.extract)?;
                    let g = tracklets::lineage_graph(
                        edges.as_slice(),
                        &t,
                        &config.order.tracklet_id_key,
                    );
                    tracklets::order_tracklets(&g, &config.order)?
                }
                OrderInput::Graph(input) => {
                    let mut g: Graph<NodeKey, NodeAttrs> = Graph::default();
                    for node in input.nodes {
                        g.set_node(node.id, node.attrs);
                    }
                    for (u, v) in input.edges {
                        g.set_edge(u, v);
                    }
                    tracklets::order_tracklets(&g, &config.order)?
                }
            };
            write_json(&order, args.pretty)
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
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

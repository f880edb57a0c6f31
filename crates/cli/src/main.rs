use anyhow::{Context, Result};
use bike_networks::{
    edge_length_ratio,
    layers::{Layer, Layers},
    provider::{BoundingBox, PbfProvider},
    select_cycle_network,
    summary::summarize,
    ProviderError, RoadNetwork,
};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{LevelFilter, Verbosity};
use log::debug;
use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

fn main() -> Result<()> {
    let args = try_get_args()?;
    debug!("{args:?}");

    match args {
        ParsedArgs::Summary {
            pbf,
            bbox,
            layers,
            title,
        } => {
            let provider = PbfProvider::new(pbf, bbox);
            let summary = summarize(&provider, layers, title)?;
            write_json(&summary)?;
        }
        ParsedArgs::Select { network } => {
            let selected = select_cycle_network(&read_network(&network)?);
            write_json(&selected)?;
        }
        ParsedArgs::Ratio {
            numerator,
            denominator,
        } => {
            let ratio = edge_length_ratio(&read_network(&numerator)?, &read_network(&denominator)?);
            match ratio {
                Some(ratio) => println!("{ratio}"),
                None => println!("undefined"),
            }
        }
    }

    Ok(())
}

fn setup_logger(level: LevelFilter) -> Result<()> {
    env_logger::Builder::new().filter_level(level).try_init()?;
    Ok(())
}

fn try_get_args() -> Result<ParsedArgs> {
    let raw_args = RawArgs::parse();

    setup_logger(raw_args.verbose.log_level_filter())?;

    let args = ParsedArgs::from(raw_args);

    Ok(args)
}

fn read_network(path: &Path) -> Result<RoadNetwork> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let network = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("reading network from {}", path.display()))?;
    Ok(network)
}

fn parse_bbox(input: &str) -> Result<BoundingBox, String> {
    input
        .parse()
        .map_err(|error: ProviderError| error.to_string())
}

fn write_json(value: &impl serde::Serialize) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(version, about = "Compare the road and cycleway networks of OpenStreetMap areas")]
struct RawArgs {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Loads the layers of an area from an `.osm.pbf` extract and prints a JSON summary.
    Summary {
        /// File path to the `.osm.pbf` extract covering the area.
        ///
        /// Defaults to `"$PWD/map.osm.pbf"`
        #[arg(long, env = "BIKE_NETWORKS_PBF")]
        pbf: Option<PathBuf>,

        /// Area to load, as `west,south,east,north` in degrees.
        #[arg(long, allow_hyphen_values = true, value_parser = parse_bbox)]
        bbox: BoundingBox,

        /// Heading of the summary, defaults to the bounding box.
        #[arg(long)]
        title: Option<String>,

        /// Loads a layer that is off by default.
        #[arg(long = "with", value_enum)]
        with: Vec<Layer>,

        /// Skips a layer that is on by default.
        #[arg(long = "without", value_enum)]
        without: Vec<Layer>,
    },

    /// Prints the cycleways of a JSON road network as a JSON road network.
    Select {
        /// JSON road network to read.
        network: PathBuf,
    },

    /// Prints the total edge length of one JSON road network divided by another's.
    Ratio {
        numerator: PathBuf,
        denominator: PathBuf,
    },
}

#[derive(Debug)]
enum ParsedArgs {
    Summary {
        pbf: PathBuf,
        bbox: BoundingBox,
        layers: Layers,
        title: String,
    },
    Select {
        network: PathBuf,
    },
    Ratio {
        numerator: PathBuf,
        denominator: PathBuf,
    },
}

impl From<RawArgs> for ParsedArgs {
    fn from(RawArgs { command, .. }: RawArgs) -> Self {
        match command {
            Command::Summary {
                pbf,
                bbox,
                title,
                with,
                without,
            } => Self::Summary {
                pbf: pbf.unwrap_or_else(|| PathBuf::from("./map.osm.pbf")),
                layers: Layers::default().merged(
                    with.into_iter()
                        .map(|layer| (layer, true))
                        .chain(without.into_iter().map(|layer| (layer, false))),
                ),
                title: title.unwrap_or_else(|| bbox.to_string()),
                bbox,
            },
            Command::Select { network } => Self::Select { network },
            Command::Ratio {
                numerator,
                denominator,
            } => Self::Ratio {
                numerator,
                denominator,
            },
        }
    }
}

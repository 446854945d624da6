//! Iso Diagram CLI
//!
//! Usage:
//!   iso-diagram [OPTIONS] --config <FILE> <COMMAND>
//!
//! Commands:
//!   validate    Check every icon reference of the menu configuration
//!   categories  Print the resolved categories as JSON
//!   search      Search the resolved catalog
//!   place       Place an icon into a diagram document
//!   scene       Print the synchronized scene of a view

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use iso_diagram::catalog::load_pack;
use iso_diagram::model::DiagramDocument;
use iso_diagram::scene::NodeIcon;
use iso_diagram::{
    new_diagram, open_diagram, CatalogEngine, CatalogIndex, ConfigError, Editor, EditorConfig,
    EditorError, IconMenuConfig, PlacementOutcome, Tile,
};

#[derive(Parser)]
#[command(name = "iso-diagram")]
#[command(about = "Icon catalog and placement tools for isometric diagrams")]
struct Cli {
    /// Icon menu configuration (JSON, or TOML by extension)
    #[arg(short, long)]
    config: PathBuf,

    /// Icon pack file (JSON array of icons); may be repeated
    #[arg(short, long = "pack")]
    packs: Vec<PathBuf>,

    /// Editor settings (TOML format)
    #[arg(short, long)]
    editor_config: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check every icon reference of the menu configuration
    Validate,

    /// Print the resolved categories as JSON
    Categories,

    /// Search the resolved catalog by id, name or collection
    Search { query: String },

    /// Place an icon into a diagram document
    Place {
        /// Diagram document to edit (a new diagram if it does not exist)
        #[arg(short, long)]
        diagram: PathBuf,

        /// Icon id to place
        #[arg(short, long)]
        icon: String,

        /// Target tile as x,y; the nearest free tile is used
        #[arg(short, long, value_parser = parse_tile, allow_hyphen_values = true)]
        tile: Tile,

        /// View to place into (defaults to the first view)
        #[arg(long)]
        view: Option<String>,

        /// Output file (defaults to overwriting the diagram)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the synchronized scene of a view
    Scene {
        #[arg(short, long)]
        diagram: PathBuf,

        #[arg(long)]
        view: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = match load_catalog(&cli) {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };
    let editor_config = match &cli.editor_config {
        Some(path) => match load(path, EditorConfig::from_file) {
            Ok(config) => config,
            Err(code) => return code,
        },
        None => EditorConfig::default(),
    };

    match run(&cli.command, &catalog, editor_config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load one input file, printing a source-annotated report on failure
fn load<T>(
    path: &Path,
    loader: impl FnOnce(&Path) -> Result<T, ConfigError>,
) -> Result<T, ExitCode> {
    loader(path).map_err(|err| {
        let source = fs::read_to_string(path).unwrap_or_default();
        eprintln!("{}", err.format(&source, &path.display().to_string()));
        ExitCode::FAILURE
    })
}

fn load_catalog(cli: &Cli) -> Result<CatalogEngine, ExitCode> {
    let config = load(&cli.config, IconMenuConfig::from_file)?;
    let mut index = CatalogIndex::new();
    for path in &cli.packs {
        let added = index.add_pack(load(path, load_pack)?);
        info!(pack = %path.display(), added, "Loaded icon pack");
    }
    CatalogEngine::new(config, index).map_err(|err| {
        eprintln!("Error: {}", err);
        ExitCode::FAILURE
    })
}

fn run(
    command: &Command,
    catalog: &CatalogEngine,
    editor_config: EditorConfig,
) -> Result<ExitCode, EditorError> {
    match command {
        Command::Validate => Ok(validate(catalog)),
        Command::Categories => {
            print_json(catalog.categories())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Search { query } => {
            if !catalog.settings().enable_search {
                eprintln!("Search is disabled by the configuration (settings.enableSearch)");
            }
            for icon in catalog.search(query) {
                println!(
                    "{}\t{}\t{}",
                    icon.id,
                    icon.name,
                    icon.menu_group().unwrap_or("-")
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Place {
            diagram,
            icon,
            tile,
            view,
            output,
        } => place(
            catalog,
            editor_config,
            diagram,
            icon,
            *tile,
            view.as_deref(),
            output.as_deref(),
        ),
        Command::Scene { diagram, view } => {
            let model = open_diagram(diagram, catalog, &editor_config)?;
            let mut editor = Editor::new(model, editor_config);
            if let Some(view) = view {
                editor.change_view(view)?;
            }
            print_scene(&editor);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn validate(catalog: &CatalogEngine) -> ExitCode {
    let report = catalog.validate();
    if report.is_valid {
        println!(
            "OK: {} categories, {} icons",
            catalog.categories().len(),
            catalog.flattened_icons().len()
        );
        return ExitCode::SUCCESS;
    }
    for error in &report.errors {
        println!("{}", error);
    }
    ExitCode::FAILURE
}

fn place(
    catalog: &CatalogEngine,
    editor_config: EditorConfig,
    diagram: &Path,
    icon: &str,
    tile: Tile,
    view: Option<&str>,
    output: Option<&Path>,
) -> Result<ExitCode, EditorError> {
    let model = if diagram.exists() {
        open_diagram(diagram, catalog, &editor_config)?
    } else {
        new_diagram(catalog, &editor_config)
    };

    let mut editor = Editor::new(model, editor_config);
    if let Some(view) = view {
        editor.change_view(view)?;
    }

    match editor.place_at(icon, tile)? {
        PlacementOutcome::Placed { item_id, tile } => {
            println!("Placed {} as {} at {},{}", icon, item_id, tile.x, tile.y);
        }
        PlacementOutcome::GridExhausted => {
            eprintln!(
                "No free tile within {} tiles of {},{}",
                editor.scene().search_radius,
                tile.x,
                tile.y
            );
            return Ok(ExitCode::FAILURE);
        }
        PlacementOutcome::Ignored => return Ok(ExitCode::FAILURE),
    }

    let target = output.unwrap_or(diagram);
    DiagramDocument::save(&editor.model()).write_file(target)?;
    Ok(ExitCode::SUCCESS)
}

fn print_scene(editor: &Editor) {
    let scene = editor.scene();
    println!("view {}", scene.view_id);
    for node in &scene.nodes {
        let icon = match &node.icon {
            NodeIcon::Resolved(geometry) => geometry.icon_id.clone(),
            NodeIcon::Missing { icon_id } => {
                format!("{} (missing)", icon_id.as_deref().unwrap_or("-"))
            }
        };
        println!(
            "  item {} \"{}\" at {},{} ({:.1}, {:.1}) icon {}",
            node.item_id, node.name, node.tile.x, node.tile.y, node.position.x, node.position.y, icon
        );
    }
    for connector in &scene.connectors {
        println!("  connector {} via {} tiles", connector.id, connector.tiles.len());
    }
    for unroutable in &scene.unroutable {
        println!("  connector {} unroutable: {:?}", unroutable.id, unroutable.reason);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), EditorError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| EditorError::Document(e.into()))?;
    println!("{}", json);
    Ok(())
}

fn parse_tile(value: &str) -> Result<Tile, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", value))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid coordinate '{}': {}", part, e))
    };
    Ok(Tile::new(parse(x)?, parse(y)?))
}

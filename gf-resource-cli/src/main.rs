//! Game Framework Resource CLI
//!
//! Command-line interface for resource dependency analysis and resource pack
//! building.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use gf_resource::{
    AnalyzeListener, AssetsOrderType, BuildResourcePacksListener, CollectionLoadListener,
    ResourceAnalyzerController, ResourcePackBuilderConfig, ResourcePackBuilderController,
    ScatteredAssetsOrderType, SnapshotAssetDatabase,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gf-resource")]
#[command(about = "Game Framework resource analyzer and resource pack builder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Hide progress bars
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze asset dependencies of a resource collection
    Analyze {
        /// ResourceCollection.xml path
        #[arg(short, long)]
        collection: PathBuf,

        /// Asset database snapshot (YAML)
        #[arg(short, long)]
        database: PathBuf,

        /// Order of the asset list
        #[arg(long, value_enum, default_value = "name-asc")]
        order: AssetOrder,

        /// Order of the scattered asset list
        #[arg(long, value_enum, default_value = "name-asc")]
        scattered_order: ScatteredOrder,

        /// Only list assets whose name contains this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// List the versions available for packing
    Versions {
        /// Builder configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Build resource packs for a target version
    BuildPacks {
        /// Builder configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Target version
        #[arg(short, long)]
        target: String,

        /// Source versions; a full pack is always built as well
        #[arg(short, long)]
        source: Vec<String>,

        /// Use every other available version as a source
        #[arg(long, conflicts_with = "source")]
        all_sources: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AssetOrder {
    NameAsc,
    NameDesc,
    ResourceCountAsc,
    ResourceCountDesc,
    AssetCountAsc,
    AssetCountDesc,
    ScatteredCountAsc,
    ScatteredCountDesc,
}

impl From<AssetOrder> for AssetsOrderType {
    fn from(order: AssetOrder) -> Self {
        match order {
            AssetOrder::NameAsc => AssetsOrderType::AssetNameAsc,
            AssetOrder::NameDesc => AssetsOrderType::AssetNameDesc,
            AssetOrder::ResourceCountAsc => AssetsOrderType::DependencyResourceCountAsc,
            AssetOrder::ResourceCountDesc => AssetsOrderType::DependencyResourceCountDesc,
            AssetOrder::AssetCountAsc => AssetsOrderType::DependencyAssetCountAsc,
            AssetOrder::AssetCountDesc => AssetsOrderType::DependencyAssetCountDesc,
            AssetOrder::ScatteredCountAsc => AssetsOrderType::ScatteredDependencyAssetCountAsc,
            AssetOrder::ScatteredCountDesc => AssetsOrderType::ScatteredDependencyAssetCountDesc,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScatteredOrder {
    NameAsc,
    NameDesc,
    HostCountAsc,
    HostCountDesc,
}

impl From<ScatteredOrder> for ScatteredAssetsOrderType {
    fn from(order: ScatteredOrder) -> Self {
        match order {
            ScatteredOrder::NameAsc => ScatteredAssetsOrderType::AssetNameAsc,
            ScatteredOrder::NameDesc => ScatteredAssetsOrderType::AssetNameDesc,
            ScatteredOrder::HostCountAsc => ScatteredAssetsOrderType::HostAssetCountAsc,
            ScatteredOrder::HostCountDesc => ScatteredAssetsOrderType::HostAssetCountDesc,
        }
    }
}

/// Feeds listener callbacks into a progress bar
struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    fn new(quiet: bool) -> Result<Self> {
        if quiet {
            return Ok(Self { bar: None });
        }
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar: Some(bar) })
    }

    fn step(&self, message: &'static str, index: usize, count: usize) {
        if let Some(bar) = &self.bar {
            bar.set_message(message);
            bar.set_length(count as u64);
            bar.set_position(index as u64 + 1);
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl CollectionLoadListener for Progress {
    fn on_loading_resource(&mut self, index: usize, count: usize) {
        self.step("Loading resources", index, count);
    }

    fn on_loading_asset(&mut self, index: usize, count: usize) {
        self.step("Loading assets", index, count);
    }

    fn on_load_completed(&mut self) {
        self.finish();
    }
}

impl AnalyzeListener for Progress {
    fn on_analyzing_asset(&mut self, index: usize, count: usize) {
        self.step("Analyzing", index, count);
    }

    fn on_analyze_completed(&mut self) {
        self.finish();
    }
}

impl BuildResourcePacksListener for Progress {
    fn on_build_resource_packs_started(&mut self, count: usize) {
        if let Some(bar) = &self.bar {
            bar.set_message("Building resource packs");
            bar.set_length(count as u64);
            bar.set_position(0);
        }
    }

    fn on_build_resource_pack_success(
        &mut self,
        index: usize,
        count: usize,
        _source_version: Option<&str>,
        _target_version: &str,
    ) {
        self.step("Building resource packs", index, count);
    }

    fn on_build_resource_pack_failure(
        &mut self,
        index: usize,
        count: usize,
        _source_version: Option<&str>,
        _target_version: &str,
    ) {
        self.step("Building resource packs", index, count);
    }

    fn on_build_resource_packs_completed(&mut self, _success_count: usize, _count: usize) {
        self.finish();
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            collection,
            database,
            order,
            scattered_order,
            filter,
        } => analyze_command(
            collection,
            database,
            order.into(),
            scattered_order.into(),
            filter,
            cli.quiet,
        ),
        Commands::Versions { config } => versions_command(config),
        Commands::BuildPacks {
            config,
            target,
            source,
            all_sources,
        } => build_packs_command(config, target, source, all_sources, cli.quiet),
    }
}

fn analyze_command(
    collection: PathBuf,
    database: PathBuf,
    order: AssetsOrderType,
    scattered_order: ScatteredAssetsOrderType,
    filter: Option<String>,
    quiet: bool,
) -> Result<()> {
    let database = SnapshotAssetDatabase::load(&database)
        .with_context(|| format!("Failed to load asset database {:?}", database))?;
    let mut controller = ResourceAnalyzerController::new(database, &collection);

    // A finished bar stays finished, so each phase draws its own
    if !controller.prepare(&mut Progress::new(quiet)?) {
        bail!(
            "Can not parse {:?}, please use the resource collection editor to create it first",
            collection
        );
    }
    controller.analyze(&mut Progress::new(quiet)?)?;

    let filter = filter.as_deref();
    println!("Assets:");
    for name in controller.get_asset_names(order, filter) {
        let data = controller.get_dependency_data(&name)?;
        println!(
            "  {} (resources: {}, assets: {}, scattered: {})",
            name,
            data.dependency_resource_count(),
            data.dependency_asset_count(),
            data.scattered_dependency_asset_count()
        );
        for resource in data.dependency_resources() {
            println!("    -> {}", resource);
        }
    }

    println!("Scattered assets:");
    for name in controller.get_scattered_asset_names(scattered_order, filter) {
        let hosts = controller.get_host_assets(&name);
        println!("  {} (hosts: {})", name, hosts.len());
        for host in hosts {
            println!("    <- {} [{}]", host.name, host.resource);
        }
    }

    let circular = controller.get_circular_dependency_datas();
    println!("Circular dependencies: {}", circular.len());
    for route in circular {
        println!("  {}", route.join(" -> "));
    }

    Ok(())
}

fn versions_command(config: PathBuf) -> Result<()> {
    let config = ResourcePackBuilderConfig::load(&config)
        .with_context(|| format!("Failed to load builder configuration {:?}", config))?;
    let controller = ResourcePackBuilderController::new(config)?;
    if !controller.is_valid_working_directory() {
        bail!(
            "Working directory {:?} has no Full directory",
            controller.config().working_directory
        );
    }

    for name in controller.get_version_names() {
        println!("{}", name);
    }
    Ok(())
}

fn build_packs_command(
    config: PathBuf,
    target: String,
    source: Vec<String>,
    all_sources: bool,
    quiet: bool,
) -> Result<()> {
    let config = ResourcePackBuilderConfig::load(&config)
        .with_context(|| format!("Failed to load builder configuration {:?}", config))?;
    let controller = ResourcePackBuilderController::new(config)?;
    if !controller.is_valid_working_directory() {
        bail!(
            "Working directory {:?} has no Full directory",
            controller.config().working_directory
        );
    }

    let sources = if all_sources {
        controller
            .get_version_names()
            .into_iter()
            .filter(|version| *version != target)
            .collect()
    } else {
        source
    };

    let mut progress = Progress::new(quiet)?;
    let count = sources.len() + 1;
    let success_count = controller.build_resource_packs(&sources, &target, &mut progress);
    println!(
        "Built {} of {} resource packs into {:?}",
        success_count,
        count,
        controller.output_path()
    );

    if success_count != count {
        bail!("{} resource packs failed", count - success_count);
    }
    Ok(())
}

mod cli;
mod telemetry;

use chrono::NaiveDate;
use clap::Parser;
use sitescore::catalog;
use sitescore::compare;
use sitescore::config;
use sitescore::error::{Result, SiteScoreError};
use sitescore::geocode::{self, Gazetteer, Geocoder};
use sitescore::registry::{store, SiteRegistry};
use sitescore::report::{self, OutputFormat};
use sitescore::scoring;
use sitescore::search::{self, CombineMode, FilterSpec, RadiusFilter};
use sitescore::types::catalog::Catalog;
use sitescore::types::scoring::{total_scale, ScoredResult};
use sitescore::types::site::{Coordinates, EnvironmentalClass, NewSite, Site};
use std::path::PathBuf;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const PENDING: i32 = 1;
    pub const DISQUALIFIED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

struct Workspace {
    catalog: Catalog,
    registry: SiteRegistry,
    registry_path: PathBuf,
    gazetteer: Gazetteer,
    search_mode: CombineMode,
}

impl Workspace {
    fn save(&self) -> Result<()> {
        store::save(&self.registry_path, &self.registry)
    }
}

fn open_workspace(cli: &cli::Cli) -> Result<Workspace> {
    let loaded = config::load_config(&cli.dir)?;
    telemetry::init(cli.verbose, cli.quiet, &loaded.config.log_level())?;
    if !loaded.from_workspace {
        tracing::info!(
            dir = %cli.dir.display(),
            "no {} found; using defaults",
            config::DEFAULT_CONFIG_FILE
        );
    }

    let catalog = catalog::resolve(&loaded.config, &cli.dir)?;
    let registry_path = cli.dir.join(loaded.config.registry_path());
    let registry = store::load(&registry_path, &catalog)?;
    let gazetteer = Gazetteer::from_config(&loaded.config.gazetteer())?;
    tracing::debug!(
        catalog = %catalog.name,
        sites = registry.len(),
        addresses = gazetteer.len(),
        "workspace ready"
    );

    Ok(Workspace {
        catalog,
        registry,
        registry_path,
        gazetteer,
        search_mode: loaded.config.search_mode(),
    })
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    let mut workspace = open_workspace(&cli)?;

    match cli.command {
        cli::Commands::Catalog(cmd) => {
            let rendered = report::render_catalog(&workspace.catalog, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Add(cmd) => {
            let date = match &cmd.date {
                Some(value) => parse_date(value)?,
                None => chrono::Local::now().date_naive(),
            };
            let manual = Coordinates::from_pair(cmd.lat, cmd.lon)?;
            let coordinates =
                geocode::coordinates_for(&workspace.gazetteer, cmd.address.as_deref(), manual);
            if coordinates.is_none() && cmd.address.is_some() {
                eprintln!(
                    "warning: could not geocode address; set coordinates later with `sitescore locate`"
                );
            }

            let similar = workspace
                .registry
                .similar_names(&cmd.name)
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>();

            let mut new_site = NewSite::new(cmd.name.clone(), date);
            if let Some(address) = cmd.address {
                new_site = new_site.with_address(address);
            }
            if let Some(coordinates) = coordinates {
                new_site = new_site.with_coordinates(coordinates.latitude, coordinates.longitude);
            }
            if let Some(area) = cmd.area {
                new_site = new_site.with_area(area);
            }
            if let Some(class) = cmd.class {
                new_site = new_site.with_environmental_class(class.parse::<EnvironmentalClass>()?);
            }
            if let Some(notes) = cmd.notes {
                new_site = new_site.with_notes(notes);
            }

            let id = workspace.registry.add(new_site)?;
            workspace.save()?;
            if !similar.is_empty() {
                eprintln!("warning: similar site names exist: {}", similar.join(", "));
            }
            println!("added site {} ({id})", cmd.name);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Remove(cmd) => {
            let removed = workspace.registry.remove(&cmd.name)?;
            workspace.save()?;
            println!("removed site {} ({})", removed.name, removed.id);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::List => {
            let sites = workspace.registry.list().iter().collect::<Vec<_>>();
            print_site_lines(&sites, &workspace.catalog);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Show(cmd) => {
            let site = workspace.registry.get(&cmd.name)?;
            let rendered =
                report::render_site(site, &workspace.catalog, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Answer(cmd) => {
            let mut answers = workspace.registry.get(&cmd.name)?.answers.clone();
            for assignment in &cmd.set {
                let (criterion, option) = assignment.split_once('=').ok_or_else(|| {
                    SiteScoreError::Validation(format!(
                        "expected CRITERION=OPTION, got '{assignment}'"
                    ))
                })?;
                let key = answers.answer(&workspace.catalog, criterion.trim(), option.trim())?;
                tracing::debug!(criterion = criterion.trim(), option = %key, "answer recorded");
            }
            for criterion in &cmd.clear {
                workspace.catalog.criterion(criterion)?;
                if !answers.clear(criterion) {
                    eprintln!("warning: criterion {criterion} had no answer");
                }
            }

            let scored = scoring::score(&workspace.catalog, &answers)?;
            workspace.registry.update_answers(&cmd.name, answers)?;
            workspace.registry.update_scores(&cmd.name, scored.clone())?;
            workspace.save()?;
            print_scores(&cmd.name, &scored, &workspace.catalog);

            if scored.disqualified {
                Ok(exit_code::DISQUALIFIED)
            } else if scored.total.is_pending() {
                Ok(exit_code::PENDING)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Locate(cmd) => {
            if cmd.clear {
                workspace.registry.set_coordinates(&cmd.name, None, None)?;
            } else if let Some(address) = &cmd.address {
                let coordinates = workspace.gazetteer.resolve(address)?;
                workspace.registry.set_coordinates(
                    &cmd.name,
                    Some(coordinates.latitude),
                    Some(coordinates.longitude),
                )?;
            } else if cmd.lat.is_some() || cmd.lon.is_some() {
                workspace
                    .registry
                    .set_coordinates(&cmd.name, cmd.lat, cmd.lon)?;
            } else {
                return Err(SiteScoreError::Validation(
                    "locate needs --lat/--lon, --address or --clear".to_string(),
                ));
            }
            workspace.save()?;
            match workspace.registry.get(&cmd.name)?.coordinates {
                Some(coordinates) => println!("{}: {coordinates}", cmd.name),
                None => println!("{}: coordinates cleared", cmd.name),
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Note(cmd) => {
            workspace.registry.set_notes(&cmd.name, cmd.text)?;
            workspace.save()?;
            println!("notes updated for {}", cmd.name);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Search(cmd) => {
            let filter = build_filter(&cmd, &workspace)?;
            let found = search::search(&workspace.registry, &filter)?;
            tracing::info!(matches = found.len(), mode = ?filter.mode, "search finished");
            match &cmd.format {
                Some(format) => {
                    let rendered =
                        report::render_sites(&found, &workspace.catalog, output_format(format))?;
                    println!("{rendered}");
                }
                None => print_site_lines(&found, &workspace.catalog),
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Compare(cmd) => {
            let ranked = compare::rank(&workspace.registry, &cmd.names)?;
            let rendered =
                report::render_comparison(&ranked, &workspace.catalog, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Export(cmd) => {
            let sites = workspace.registry.list().iter().collect::<Vec<_>>();
            let rendered = match cmd.format {
                cli::ExportFormat::Csv => report::csv::to_string(&sites, &workspace.catalog)?,
                cli::ExportFormat::Json => {
                    report::render_sites(&sites, &workspace.catalog, OutputFormat::Json)?
                }
                cli::ExportFormat::Md => {
                    report::render_sites(&sites, &workspace.catalog, OutputFormat::Md)?
                }
            };
            match cmd.output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, rendered)?;
                    tracing::info!(path = %path.display(), sites = sites.len(), "export written");
                    println!("exported {} sites to {}", sites.len(), path.display());
                }
                None if rendered.ends_with('\n') => print!("{rendered}"),
                None => println!("{rendered}"),
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn output_format(format: &cli::ReportFormat) -> OutputFormat {
    match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
        SiteScoreError::Validation(format!("invalid date '{value}' (expected YYYY-MM-DD): {err}"))
    })
}

fn parse_center(value: &str) -> Result<Coordinates> {
    let invalid = || SiteScoreError::Validation(format!("expected LAT,LON, got '{value}'"));
    let (latitude, longitude) = value.split_once(',').ok_or_else(invalid)?;
    let latitude = latitude.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = longitude.trim().parse::<f64>().map_err(|_| invalid())?;
    Coordinates::new(latitude, longitude)
}

fn build_filter(cmd: &cli::SearchCommand, workspace: &Workspace) -> Result<FilterSpec> {
    let center = match (&cmd.near, &cmd.near_address) {
        (Some(near), _) => Some(parse_center(near)?),
        (None, Some(address)) => Some(workspace.gazetteer.resolve(address)?),
        (None, None) => None,
    };
    let radius = match (center, cmd.radius_km) {
        (Some(center), Some(radius_km)) => Some(RadiusFilter { center, radius_km }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(SiteScoreError::Validation(
                "--radius-km is required with --near or --near-address".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(SiteScoreError::Validation(
                "--radius-km needs a centre from --near or --near-address".to_string(),
            ))
        }
    };

    let mut filter = FilterSpec {
        text: cmd.text.clone(),
        min_area: cmd.min_area,
        environmental_class: cmd
            .class
            .as_deref()
            .map(str::parse::<EnvironmentalClass>)
            .transpose()?,
        radius,
        min_total_score: cmd.min_total,
        mode: match cmd.mode {
            Some(cli::Mode::And) => CombineMode::And,
            Some(cli::Mode::Or) => CombineMode::Or,
            None => workspace.search_mode,
        },
        ..FilterSpec::default()
    };
    for entry in &cmd.min_score {
        let (category, minimum) = entry
            .split_once('=')
            .ok_or_else(|| SiteScoreError::Validation(format!("expected CATEGORY=N, got '{entry}'")))?;
        let minimum = minimum.trim().parse::<u8>().map_err(|_| {
            SiteScoreError::Validation(format!("minimum score must be 1-5, got '{minimum}'"))
        })?;
        filter
            .min_category_scores
            .insert(category.trim().to_string(), minimum);
    }
    Ok(filter)
}

fn print_site_lines(sites: &[&Site], catalog: &Catalog) {
    if sites.is_empty() {
        println!("no sites");
        return;
    }
    let (_, max) = total_scale(catalog);
    for site in sites {
        println!(
            "{} {}  {}  total: {}{}",
            site.id,
            site.name,
            site.date,
            report::format_total(site.scores.total, max),
            if site.disqualified() { "  [disqualified]" } else { "" }
        );
    }
}

fn print_scores(name: &str, scored: &ScoredResult, catalog: &Catalog) {
    let (_, max) = total_scale(catalog);
    println!("{name}");
    for category in &scored.categories {
        println!(
            "  {}: {}{}",
            category.id,
            category.score,
            if category.gated { " (gated)" } else { "" }
        );
    }
    println!("  total: {}", report::format_total(scored.total, max));
    if scored.disqualified {
        println!("  disqualified: a gating criterion failed");
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}

//! Fusion CLI
//!
//! Interactive shell around the fusion engine: pick two species, inspect
//! them, fuse them, view the fused type matchups and look for fusion partners
//! whose stat spread fits the primary.
//!
//! Usage:
//!   cargo run --bin fusion-cli -- [--offline]
//!
//! `--offline` resolves type matchups from the built-in chart instead of the
//! relation service. Species data always comes from the data service.

use std::env;
use std::error::Error;
use std::sync::Arc;

use fusion_engine::core::effectiveness::{resolve_with, TypeEffectiveness};
use fusion_engine::core::fusion::{fuse_with, FusionOptions};
use fusion_engine::data::record::AttributeRecord;
use fusion_engine::data::species::SpeciesStub;
use fusion_engine::data::type_chart::TypeChart;
use fusion_engine::remote::{find_candidates_with, resolve_remote, SearchOptions};
use fusion_engine::service::{AttributeService, PokeApiClient, SpeciesCatalogProvider, TypeRelationService};
use fusion_engine::{EngineConfig, EngineError, StatProfile};
use inquire::Select;
use rand::seq::SliceRandom;

#[derive(Clone, Debug)]
struct Selected {
    stub: SpeciesStub,
    record: AttributeRecord,
}

/// Which species currently fill the two fusion slots.
#[derive(Debug, Default)]
struct Session {
    primary: Option<Selected>,
    secondary: Option<Selected>,
}

impl Session {
    fn swap(&mut self) {
        std::mem::swap(&mut self.primary, &mut self.secondary);
    }

    fn pair(&self) -> Option<(&Selected, &Selected)> {
        Some((self.primary.as_ref()?, self.secondary.as_ref()?))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum MenuItem {
    PickPrimary,
    PickSecondary,
    Swap,
    Fuse,
    FindPartner,
    Quit,
}

impl std::fmt::Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MenuItem::PickPrimary => "Pick primary",
            MenuItem::PickSecondary => "Pick secondary",
            MenuItem::Swap => "Swap primary and secondary",
            MenuItem::Fuse => "Fuse",
            MenuItem::FindPartner => "Find a fusion partner for the primary",
            MenuItem::Quit => "Quit",
        };
        f.write_str(label)
    }
}

struct App {
    config: EngineConfig,
    client: Arc<PokeApiClient>,
    chart: TypeChart,
    catalog: Vec<SpeciesStub>,
    offline: bool,
    session: Session,
}

impl App {
    async fn pick(&self, slot: &str) -> Result<Option<Selected>, Box<dyn Error>> {
        let labels: Vec<String> = self.catalog.iter().map(SpeciesStub::label).collect();
        let choice = match Select::new(&format!("Select the {} species:", slot), labels.clone())
            .with_page_size(12)
            .prompt_skippable()?
        {
            Some(choice) => choice,
            None => return Ok(None),
        };
        let Some(position) = labels.iter().position(|label| *label == choice) else {
            return Ok(None);
        };
        let stub = self.catalog[position].clone();

        match self.client.fetch_attributes(&stub.identifier).await {
            Ok(record) => {
                print_record(&stub.display_name, &record);
                Ok(Some(Selected { stub, record }))
            }
            Err(err @ EngineError::NotFound { .. }) => {
                println!("❌ {}. Please check the name and try again.", err);
                Ok(None)
            }
            Err(err) => {
                println!("❌ Could not fetch {}: {}", stub.display_name, err);
                Ok(None)
            }
        }
    }

    async fn fuse(&self) -> Result<(), Box<dyn Error>> {
        let Some((primary, secondary)) = self.session.pair() else {
            println!("⚠️  Fetch both a primary and a secondary species before fusing.");
            return Ok(());
        };
        let fused = fuse_with(
            &primary.record,
            &secondary.record,
            FusionOptions {
                rounding: self.config.rounding,
            },
        );
        let name = format!("{}/{}", primary.stub.display_name, secondary.stub.display_name);
        print_record(&name, &fused);

        let effectiveness = if self.offline {
            resolve_with(&self.chart, &fused.types, self.config.reconcile)?
        } else {
            let service: Arc<dyn TypeRelationService> = self.client.clone();
            resolve_remote(service, &fused.types, Some(&self.chart), self.config.reconcile).await?
        };
        print_effectiveness(&self.chart, &fused.types, &effectiveness);
        Ok(())
    }

    async fn find_partner(&self) -> Result<(), Box<dyn Error>> {
        let Some(primary) = &self.session.primary else {
            println!("⚠️  Fetch a primary species first.");
            return Ok(());
        };
        let profile = StatProfile::of(&primary.record.base_stats);
        println!(
            "🔎 Searching {} species (total ≥ {}, best stats {} > {}, lowest {})...",
            self.catalog.len(),
            profile.total.saturating_sub(self.config.total_margin),
            profile.top_two[0],
            profile.top_two[1],
            profile.lowest
        );

        let service: Arc<dyn AttributeService> = self.client.clone();
        let report = find_candidates_with(
            service,
            &self.catalog,
            &primary.record.base_stats,
            &primary.stub.identifier,
            &SearchOptions::from_config(&self.config),
        )
        .await;

        if !report.failures.is_empty() {
            println!("⚠️  {} species could not be fetched and were skipped", report.failures.len());
        }
        if report.candidates.is_empty() {
            println!("No compatible partner found.");
            return Ok(());
        }
        println!("✅ {} compatible partners: {}", report.candidates.len(), report.candidates.join(", "));
        if let Some(pick) = report.candidates.choose(&mut rand::thread_rng()) {
            println!("🎲 Suggested partner: {}", pick);
        }
        Ok(())
    }
}

fn print_record(title: &str, record: &AttributeRecord) {
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  {}", title);
    println!("  Types: {}", record.types.join(" / "));
    println!("  Base Stats:");
    for (key, value) in record.base_stats.iter() {
        println!("    {:<8}{:>4}", key.as_str(), value);
    }
    println!("    {:<8}{:>4}", "Total", record.base_stats.total());
    println!("  Main Ability: {}", record.main_ability);
    println!("  Passive Ability: {}", record.passive_ability);
    if let Some(sprite) = &record.sprite {
        println!("  Sprite: {}", sprite);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

fn print_effectiveness(chart: &TypeChart, types: &[String], effectiveness: &TypeEffectiveness) {
    println!("  Type Effectiveness:");
    if !effectiveness.strong_against_us.is_empty() {
        let entries: Vec<String> = effectiveness
            .strong_against_us
            .iter()
            .map(|t| match chart.multiplier(t, types) {
                Ok(m) if m >= 4.0 => format!("{} (4x)", t),
                _ => t.clone(),
            })
            .collect();
        println!("    2x Damage From: {}", entries.join(", "));
    }
    if !effectiveness.weak_against_us.is_empty() {
        let entries: Vec<&str> = effectiveness.weak_against_us.iter().map(String::as_str).collect();
        println!("    0.5x Damage From: {}", entries.join(", "));
    }
    if !effectiveness.no_effect.is_empty() {
        let entries: Vec<&str> = effectiveness.no_effect.iter().map(String::as_str).collect();
        println!("    No Damage From: {}", entries.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let offline = env::args().skip(1).any(|arg| arg == "--offline");
    let config = EngineConfig::from_env()?;
    let chart = match &config.type_chart_path {
        Some(path) => TypeChart::load_from_file(path)?,
        None => TypeChart::new(),
    };
    let client = Arc::new(PokeApiClient::from_config(&config)?);

    println!("╔═══════════════════════════════════════╗");
    println!("║          🧬 Fusion Calculator 🧬        ║");
    println!("╚═══════════════════════════════════════╝");
    println!("📖 Loading species list from {}...", config.base_url);
    let catalog = client.list_species().await?;
    println!("   Found {} species", catalog.len());

    let mut app = App {
        config,
        client,
        chart,
        catalog,
        offline,
        session: Session::default(),
    };

    let menu = vec![
        MenuItem::PickPrimary,
        MenuItem::PickSecondary,
        MenuItem::Swap,
        MenuItem::Fuse,
        MenuItem::FindPartner,
        MenuItem::Quit,
    ];
    loop {
        println!();
        let item = match Select::new("What next?", menu.clone()).prompt() {
            Ok(item) => item,
            Err(_) => break,
        };
        match item {
            MenuItem::PickPrimary => {
                if let Some(selected) = app.pick("primary").await? {
                    app.session.primary = Some(selected);
                }
            }
            MenuItem::PickSecondary => {
                if let Some(selected) = app.pick("secondary").await? {
                    app.session.secondary = Some(selected);
                }
            }
            MenuItem::Swap => {
                app.session.swap();
                for (slot, selected) in [("Primary", &app.session.primary), ("Secondary", &app.session.secondary)] {
                    if let Some(selected) = selected {
                        print_record(&format!("{}: {}", slot, selected.stub.display_name), &selected.record);
                    }
                }
            }
            MenuItem::Fuse => app.fuse().await?,
            MenuItem::FindPartner => app.find_partner().await?,
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

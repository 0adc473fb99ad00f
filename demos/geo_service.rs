//! Geo Service - Jurisdiction lookups on top of `TreeCache`
//!
//! Caches a geographic hierarchy and derives per-location facts (display
//! path, effective tax rate, emergency status) from each location's branch.
//! Every cached location keeps its ancestors cached, so a single branch read
//! is enough.
//!
//! Run with `cargo run --example geo_service`; set `RUST_LOG=lru_tree=debug`
//! to watch evictions.

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_tree::{CacheNode, Config, TreeCache};

const ROOT_ID: &str = "earth";

/// Information about a geographic location.
#[derive(Debug, Clone, Default)]
struct GeoData {
    name: String,
    /// country, state, county, city or district
    kind: &'static str,
    /// Local tax rate in percent
    tax_rate: f64,
    emergency: bool,
}

impl GeoData {
    fn new(name: &str, kind: &'static str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            ..Self::default()
        }
    }

    fn tax_rate(mut self, tax_rate: f64) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    fn emergency(mut self) -> Self {
        self.emergency = true;
        self
    }
}

struct GeoService {
    cache: TreeCache<String, GeoData>,
}

impl GeoService {
    fn new(config: &Config) -> Result<Self> {
        let cache = TreeCache::from_config(config);
        cache.add_root(ROOT_ID.to_string(), GeoData::new("Earth", "planet"))?;
        Ok(Self { cache })
    }

    /// Adds a location under `parent_id`, or directly under the root.
    fn add_location(&self, id: &str, data: GeoData, parent_id: Option<&str>) -> Result<()> {
        let parent = parent_id.unwrap_or(ROOT_ID).to_string();
        self.cache
            .add(id.to_string(), data, &parent)
            .with_context(|| format!("adding location {id}"))
    }

    fn branch(&self, id: &str) -> Result<Vec<CacheNode<String, GeoData>>> {
        let branch = self.cache.get_branch(&id.to_string());
        if branch.is_empty() {
            // A real service would load the location from its backing store here
            return Err(anyhow!("location {id} not found"));
        }
        Ok(branch)
    }

    /// Names from the country down to `id`, joined with " > ".
    fn location_path(&self, id: &str) -> Result<String> {
        let names: Vec<_> = self
            .branch(id)?
            .into_iter()
            .skip(1)
            .map(|node| node.value.name)
            .collect();
        Ok(names.join(" > "))
    }

    /// Sum of the tax rates of `id` and every enclosing jurisdiction.
    fn effective_tax_rate(&self, id: &str) -> Result<f64> {
        Ok(self.branch(id)?.iter().map(|node| node.value.tax_rate).sum())
    }

    /// Name of the outermost jurisdiction that declared an emergency, if any.
    fn emergency_source(&self, id: &str) -> Result<Option<String>> {
        Ok(self
            .branch(id)?
            .into_iter()
            .find(|node| node.value.emergency)
            .map(|node| node.value.name))
    }

    fn print_location_info(&self, id: &str) -> Result<()> {
        println!("Location: {}", self.location_path(id)?);
        println!("Effective tax rate: {:.2}%", self.effective_tax_rate(id)?);
        match self.emergency_source(id)? {
            Some(source) => println!("Emergency status: ACTIVE (declared in {source})"),
            None => println!("Emergency status: NORMAL"),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_tree=info,geo_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Starting geo service: capacity={}", config.capacity);
    let geo = GeoService::new(&config)?;

    geo.add_location("usa", GeoData::new("United States", "country"), None)?;
    geo.add_location(
        "ca",
        GeoData::new("California", "state").tax_rate(7.25).emergency(),
        Some("usa"),
    )?;
    geo.add_location(
        "sf_county",
        GeoData::new("San Francisco County", "county").tax_rate(0.25),
        Some("ca"),
    )?;
    geo.add_location(
        "sf_city",
        GeoData::new("San Francisco", "city").tax_rate(0.5),
        Some("sf_county"),
    )?;
    geo.add_location(
        "mission",
        GeoData::new("Mission District", "district"),
        Some("sf_city"),
    )?;
    geo.add_location("tx", GeoData::new("Texas", "state").tax_rate(6.25), Some("usa"))?;
    geo.add_location("austin", GeoData::new("Austin", "city").tax_rate(2.0), Some("tx"))?;

    // Expected: CA emergency, state + county + city tax
    geo.print_location_info("mission")?;
    println!("-------------");
    // Expected: no emergency, state + city tax
    geo.print_location_info("austin")?;

    let kinds: Vec<_> = geo
        .branch("mission")?
        .iter()
        .map(|node| node.value.kind)
        .collect();
    info!("Mission branch kinds: {}", kinds.join(" > "));

    if let Err(err) = geo.location_path("atlantis") {
        info!("Lookup failed as expected: {err}");
    }
    Ok(())
}

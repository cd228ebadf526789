//! In-memory farm store for development, offline runs and testing.

use async_trait::async_trait;
use chrono::NaiveDate;
use kissan_core::error::{KissanError, Result};
use kissan_core::models::farm::{check_season, normalize_email, normalize_key};
use kissan_core::models::{PlantSeason, Plot, PlotSeason, Species, User, Variety, VegetationBed};
use kissan_geo::wkt::{from_wkt, normalize_any_wkt, to_wkt};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::PlotStore;

#[derive(Debug, Default)]
struct FarmTables {
    users: Vec<User>,
    plots: Vec<Plot>,
    veg_beds: Vec<VegetationBed>,
    species: Vec<Species>,
    varieties: Vec<Variety>,
    plot_seasons: Vec<PlotSeason>,
    plant_seasons: Vec<PlantSeason>,
    next_id: i64,
}

impl FarmTables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, email: &str) -> Result<&User> {
        self.users.iter().find(|u| u.email == email).ok_or_else(|| not_found("user", email))
    }

    fn variety(&self, name: &str) -> Result<&Variety> {
        self.varieties.iter().find(|v| v.name == name).ok_or_else(|| not_found("variety", name))
    }
}

fn not_found(entity: &str, key: &str) -> KissanError {
    KissanError::RecordNotFound { entity: entity.to_string(), key: key.to_string() }
}

fn duplicate(entity: &str, key: &str) -> KissanError {
    KissanError::DuplicateRecord { entity: entity.to_string(), key: key.to_string() }
}

/// Parse and re-serialize a polygonal boundary
fn canonical_boundary(wkt: &str) -> Result<String> {
    Ok(to_wkt(&from_wkt(wkt)?))
}

/// In-memory implementation of PlotStore
#[derive(Debug, Clone, Default)]
pub struct MemoryPlotStore {
    tables: Arc<RwLock<FarmTables>>,
}

impl MemoryPlotStore {
    /// Create a new, empty in-memory farm store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlotStore for MemoryPlotStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn add_user(&self, full_name: &str, email: &str) -> Result<User> {
        let email = normalize_email(email)?;
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(duplicate("user", &email));
        }
        let user = User { id: tables.allocate_id(), full_name: normalize_key(full_name), email };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn add_plot(&self, name: &str, boundary_wkt: &str, email: &str) -> Result<Plot> {
        let boundary = canonical_boundary(boundary_wkt)?;
        let (name, email) = (normalize_key(name), normalize_key(email));
        let mut tables = self.tables.write().await;
        tables.user(&email)?;
        if tables.plots.iter().any(|p| p.name == name && p.owner_email == email) {
            return Err(duplicate("plot", &format!("{} ({})", name, email)));
        }
        let plot = Plot { id: tables.allocate_id(), name, owner_email: email, boundary };
        tables.plots.push(plot.clone());
        Ok(plot)
    }

    async fn add_veg_bed(
        &self,
        name: &str,
        boundary_wkt: &str,
        email: &str,
    ) -> Result<VegetationBed> {
        let boundary = canonical_boundary(boundary_wkt)?;
        let (name, email) = (normalize_key(name), normalize_key(email));
        let mut tables = self.tables.write().await;
        tables.user(&email)?;
        if tables.veg_beds.iter().any(|b| b.name == name && b.owner_email == email) {
            return Err(duplicate("vegetation bed", &format!("{} ({})", name, email)));
        }
        let bed = VegetationBed { id: tables.allocate_id(), name, owner_email: email, boundary };
        tables.veg_beds.push(bed.clone());
        Ok(bed)
    }

    async fn add_species(&self, name: &str) -> Result<Species> {
        let name = normalize_key(name);
        let mut tables = self.tables.write().await;
        if tables.species.iter().any(|s| s.name == name) {
            return Err(duplicate("species", &name));
        }
        let species = Species { id: tables.allocate_id(), name };
        tables.species.push(species.clone());
        Ok(species)
    }

    async fn add_variety(&self, name: &str, species_name: &str) -> Result<Variety> {
        let (name, species) = (normalize_key(name), normalize_key(species_name));
        let mut tables = self.tables.write().await;
        if !tables.species.iter().any(|s| s.name == species) {
            return Err(not_found("species", &species));
        }
        if tables.varieties.iter().any(|v| v.name == name) {
            return Err(duplicate("variety", &name));
        }
        let variety = Variety { id: tables.allocate_id(), name, species };
        tables.varieties.push(variety.clone());
        Ok(variety)
    }

    async fn add_plot_season(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        variety: &str,
        plot_name: &str,
        email: &str,
    ) -> Result<PlotSeason> {
        check_season(start, end)?;
        let (variety, plot_name, email) =
            (normalize_key(variety), normalize_key(plot_name), normalize_key(email));
        let mut tables = self.tables.write().await;
        let variety = tables.variety(&variety)?.name.clone();
        let plot_id = tables
            .plots
            .iter()
            .find(|p| p.name == plot_name && p.owner_email == email)
            .map(|p| p.id)
            .ok_or_else(|| not_found("plot", &format!("{} ({})", plot_name, email)))?;
        let season =
            PlotSeason { id: tables.allocate_id(), plot_id, variety, start_date: start, end_date: end };
        tables.plot_seasons.push(season.clone());
        Ok(season)
    }

    async fn add_plant_season(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        position_wkt: &str,
        variety: &str,
        veg_bed_name: &str,
        email: &str,
    ) -> Result<PlantSeason> {
        check_season(start, end)?;
        let position = normalize_any_wkt(position_wkt)?;
        let (variety, bed_name, email) =
            (normalize_key(variety), normalize_key(veg_bed_name), normalize_key(email));
        let mut tables = self.tables.write().await;
        let variety = tables.variety(&variety)?.name.clone();
        let veg_bed_id = tables
            .veg_beds
            .iter()
            .find(|b| b.name == bed_name && b.owner_email == email)
            .map(|b| b.id)
            .ok_or_else(|| not_found("vegetation bed", &format!("{} ({})", bed_name, email)))?;
        let season = PlantSeason {
            id: tables.allocate_id(),
            veg_bed_id,
            variety,
            position,
            start_date: start,
            end_date: end,
        };
        tables.plant_seasons.push(season.clone());
        Ok(season)
    }

    async fn get_plot_wkt(&self, plot_name: &str, email: &str) -> Result<String> {
        let (plot_name, email) = (normalize_key(plot_name), normalize_key(email));
        let tables = self.tables.read().await;
        tables
            .plots
            .iter()
            .find(|p| p.name == plot_name && p.owner_email == email)
            .map(|p| p.boundary.clone())
            .ok_or(KissanError::UpstreamLookup { plot: plot_name, email })
    }

    async fn list_plots(&self, email: &str) -> Result<Vec<Plot>> {
        let email = normalize_key(email);
        let tables = self.tables.read().await;
        tables.user(&email)?;
        Ok(tables.plots.iter().filter(|p| p.owner_email == email).cloned().collect())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use kissan_core::error::Result;
use kissan_core::models::{PlantSeason, Plot, PlotSeason, Species, User, Variety, VegetationBed};

/// Port for the farm database
///
/// Names and emails are matched case-insensitively (stored lowercase).
/// Referencing a missing row fails with `RecordNotFound`, inserting a second
/// row with the same key with `DuplicateRecord`.
#[async_trait]
pub trait PlotStore: Send + Sync {
    /// Backend name for diagnostics
    fn backend(&self) -> &str;

    /// Register a user
    async fn add_user(&self, full_name: &str, email: &str) -> Result<User>;

    /// Register a plot owned by the user with `email`; `boundary_wkt` must be polygonal
    async fn add_plot(&self, name: &str, boundary_wkt: &str, email: &str) -> Result<Plot>;

    /// Register a vegetation bed owned by the user with `email`
    async fn add_veg_bed(&self, name: &str, boundary_wkt: &str, email: &str)
        -> Result<VegetationBed>;

    async fn add_species(&self, name: &str) -> Result<Species>;

    /// Register a variety of an existing species
    async fn add_variety(&self, name: &str, species_name: &str) -> Result<Variety>;

    /// Record a growing season of `variety` on a plot
    async fn add_plot_season(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        variety: &str,
        plot_name: &str,
        email: &str,
    ) -> Result<PlotSeason>;

    /// Record a growing season of individual plants in a vegetation bed
    async fn add_plant_season(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        position_wkt: &str,
        variety: &str,
        veg_bed_name: &str,
        email: &str,
    ) -> Result<PlantSeason>;

    /// Boundary of a user's plot as WKT; fails with `UpstreamLookup` when absent
    async fn get_plot_wkt(&self, plot_name: &str, email: &str) -> Result<String>;

    /// Plots owned by a user, in creation order
    async fn list_plots(&self, email: &str) -> Result<Vec<Plot>>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<()>;
}

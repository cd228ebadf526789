use async_trait::async_trait;
use chrono::NaiveDate;
use kissan_core::error::{KissanError, Result};
use kissan_core::models::farm::{check_season, normalize_email, normalize_key};
use kissan_core::models::{PlantSeason, Plot, PlotSeason, Species, User, Variety, VegetationBed};
use kissan_geo::wkt::{from_wkt, normalize_any_wkt, to_wkt};
use sqlx::Row;
use tracing::debug;

use super::{map_read_error, map_write_error, PostgresStore};
use crate::ports::PlotStore;

fn not_found(entity: &str, key: &str) -> KissanError {
    KissanError::RecordNotFound { entity: entity.to_string(), key: key.to_string() }
}

impl PostgresStore {
    async fn user_id(&self, email: &str) -> Result<i64> {
        sqlx::query_scalar("SELECT id FROM user_table WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_read_error("user", e))?
            .ok_or_else(|| not_found("user", email))
    }

    async fn variety_id(&self, name: &str) -> Result<i64> {
        sqlx::query_scalar("SELECT id FROM variety WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_read_error("variety", e))?
            .ok_or_else(|| not_found("variety", name))
    }

    /// Id of a plot or vegetation bed owned by `email`
    async fn owned_area_id(&self, table: AreaTable, name: &str, email: &str) -> Result<i64> {
        let query = format!(
            "SELECT a.id FROM {} a INNER JOIN user_table u ON a.id_user = u.id \
             WHERE a.name = $1 AND u.email = $2",
            table.name()
        );
        sqlx::query_scalar(&query)
            .bind(name)
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_read_error(table.entity(), e))?
            .ok_or_else(|| not_found(table.entity(), &format!("{} ({})", name, email)))
    }

    async fn insert_area(
        &self,
        table: AreaTable,
        name: &str,
        boundary_wkt: &str,
        email: &str,
    ) -> Result<(i64, String, String, String)> {
        let boundary = to_wkt(&from_wkt(boundary_wkt)?);
        let (name, email) = (normalize_key(name), normalize_key(email));
        let user_id = self.user_id(&email).await?;

        let query = format!(
            "INSERT INTO {} (name, delimitation, id_user) VALUES ($1, ST_GeomFromText($2), $3) \
             RETURNING id, ST_AsText(delimitation) AS boundary",
            table.name()
        );
        let row = sqlx::query(&query)
            .bind(&name)
            .bind(&boundary)
            .bind(user_id)
            .fetch_one(self.pool())
            .await
            .map_err(|e| map_write_error(table.entity(), &format!("{} ({})", name, email), e))?;

        debug!(table = table.name(), name = %name, "Inserted area");
        Ok((row.get("id"), name, email, row.get("boundary")))
    }
}

#[derive(Debug, Clone, Copy)]
enum AreaTable {
    Plot,
    VegBed,
}

impl AreaTable {
    fn name(&self) -> &'static str {
        match self {
            AreaTable::Plot => "plot",
            AreaTable::VegBed => "veg_bed",
        }
    }

    fn entity(&self) -> &'static str {
        match self {
            AreaTable::Plot => "plot",
            AreaTable::VegBed => "vegetation bed",
        }
    }
}

#[async_trait]
impl PlotStore for PostgresStore {
    fn backend(&self) -> &str {
        "postgres"
    }

    async fn add_user(&self, full_name: &str, email: &str) -> Result<User> {
        let email = normalize_email(email)?;
        let full_name = normalize_key(full_name);
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO user_table (full_name, email) VALUES ($1, $2) RETURNING id",
        )
        .bind(&full_name)
        .bind(&email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error("user", &email, e))?;

        Ok(User { id, full_name, email })
    }

    async fn add_plot(&self, name: &str, boundary_wkt: &str, email: &str) -> Result<Plot> {
        let (id, name, owner_email, boundary) =
            self.insert_area(AreaTable::Plot, name, boundary_wkt, email).await?;
        Ok(Plot { id, name, owner_email, boundary })
    }

    async fn add_veg_bed(
        &self,
        name: &str,
        boundary_wkt: &str,
        email: &str,
    ) -> Result<VegetationBed> {
        let (id, name, owner_email, boundary) =
            self.insert_area(AreaTable::VegBed, name, boundary_wkt, email).await?;
        Ok(VegetationBed { id, name, owner_email, boundary })
    }

    async fn add_species(&self, name: &str) -> Result<Species> {
        let name = normalize_key(name);
        let id: i64 = sqlx::query_scalar("INSERT INTO species (name) VALUES ($1) RETURNING id")
            .bind(&name)
            .fetch_one(self.pool())
            .await
            .map_err(|e| map_write_error("species", &name, e))?;
        Ok(Species { id, name })
    }

    async fn add_variety(&self, name: &str, species_name: &str) -> Result<Variety> {
        let (name, species) = (normalize_key(name), normalize_key(species_name));
        let species_id: i64 = sqlx::query_scalar("SELECT id FROM species WHERE name = $1")
            .bind(&species)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_read_error("species", e))?
            .ok_or_else(|| not_found("species", &species))?;

        let id: i64 =
            sqlx::query_scalar("INSERT INTO variety (name, id_species) VALUES ($1, $2) RETURNING id")
                .bind(&name)
                .bind(species_id)
                .fetch_one(self.pool())
                .await
                .map_err(|e| map_write_error("variety", &name, e))?;
        Ok(Variety { id, name, species })
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
        let variety = normalize_key(variety);
        let variety_id = self.variety_id(&variety).await?;
        let plot_id = self
            .owned_area_id(AreaTable::Plot, &normalize_key(plot_name), &normalize_key(email))
            .await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO plot_season (start_date, end_date, id_variety, id_plot) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(start)
        .bind(end)
        .bind(variety_id)
        .bind(plot_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error("plot season", plot_name, e))?;

        Ok(PlotSeason { id, plot_id, variety, start_date: start, end_date: end })
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
        let variety = normalize_key(variety);
        let variety_id = self.variety_id(&variety).await?;
        let veg_bed_id = self
            .owned_area_id(AreaTable::VegBed, &normalize_key(veg_bed_name), &normalize_key(email))
            .await?;

        let row = sqlx::query(
            "INSERT INTO plant_season (start_date, end_date, position, id_variety, id_veg_bed) \
             VALUES ($1, $2, ST_GeomFromText($3), $4, $5) \
             RETURNING id, ST_AsText(position) AS position",
        )
        .bind(start)
        .bind(end)
        .bind(&position)
        .bind(variety_id)
        .bind(veg_bed_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error("plant season", veg_bed_name, e))?;

        Ok(PlantSeason {
            id: row.get("id"),
            veg_bed_id,
            variety,
            position: row.get("position"),
            start_date: start,
            end_date: end,
        })
    }

    async fn get_plot_wkt(&self, plot_name: &str, email: &str) -> Result<String> {
        let (plot_name, email) = (normalize_key(plot_name), normalize_key(email));
        let wkt: Option<String> = sqlx::query_scalar(
            "SELECT ST_AsText(p.delimitation) FROM plot p \
             INNER JOIN user_table u ON p.id_user = u.id \
             WHERE p.name = $1 AND u.email = $2",
        )
        .bind(&plot_name)
        .bind(&email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_read_error("plot", e))?;

        wkt.ok_or(KissanError::UpstreamLookup { plot: plot_name, email })
    }

    async fn list_plots(&self, email: &str) -> Result<Vec<Plot>> {
        let email = normalize_key(email);
        self.user_id(&email).await?;

        let rows = sqlx::query(
            "SELECT p.id, p.name, ST_AsText(p.delimitation) AS boundary FROM plot p \
             INNER JOIN user_table u ON p.id_user = u.id \
             WHERE u.email = $1 ORDER BY p.id",
        )
        .bind(&email)
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_read_error("plot", e))?;

        Ok(rows
            .into_iter()
            .map(|row| Plot {
                id: row.get("id"),
                name: row.get("name"),
                owner_email: email.clone(),
                boundary: row.get("boundary"),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<()> {
        self.health_check_inner().await
    }
}

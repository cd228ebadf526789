use crate::cli::{FarmArgs, FarmCommand};
use crate::output::OutputWriter;
use crate::output_types::PlotRow;
use crate::provider::open_store;
use anyhow::Result;
use kissan_core::config::LayeredConfig;
use kissan_core::models::farm::parse_season;

pub async fn execute(args: FarmArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = open_store(config).await?;
    if config.database_url.value.is_none() && writes(&args.command) {
        output.warning("No database configured: the record is kept for this command only");
    }

    match args.command {
        FarmCommand::AddUser { full_name, email } => {
            let user = store.add_user(&full_name, &email).await?;
            record(output, format!("Added user {}", user.email), user)
        }
        FarmCommand::AddPlot { name, wkt, email } => {
            let plot = store.add_plot(&name, &wkt, &email).await?;
            record(output, format!("Added plot '{}' for {}", plot.name, plot.owner_email), plot)
        }
        FarmCommand::AddVegBed { name, wkt, email } => {
            let bed = store.add_veg_bed(&name, &wkt, &email).await?;
            record(output, format!("Added vegetation bed '{}' for {}", bed.name, bed.owner_email), bed)
        }
        FarmCommand::AddSpecies { name } => {
            let species = store.add_species(&name).await?;
            record(output, format!("Added species '{}'", species.name), species)
        }
        FarmCommand::AddVariety { name, species } => {
            let variety = store.add_variety(&name, &species).await?;
            record(output, format!("Added variety '{}' of {}", variety.name, variety.species), variety)
        }
        FarmCommand::AddPlotSeason { start, end, variety, plot, email } => {
            let (start, end) = parse_season(&start, &end)?;
            let season = store.add_plot_season(start, end, &variety, &plot, &email).await?;
            record(
                output,
                format!("Recorded {} on plot '{}' from {} to {}", season.variety, plot, start, end),
                season,
            )
        }
        FarmCommand::AddPlantSeason { start, end, position, variety, veg_bed, email } => {
            let (start, end) = parse_season(&start, &end)?;
            let season =
                store.add_plant_season(start, end, &position, &variety, &veg_bed, &email).await?;
            record(
                output,
                format!("Recorded {} in bed '{}' from {} to {}", season.variety, veg_bed, start, end),
                season,
            )
        }
        FarmCommand::PlotWkt { name, email } => {
            let wkt = store.get_plot_wkt(&name, &email).await?;
            if output.is_json() {
                output.result(serde_json::json!({ "name": name, "wkt": wkt }))
            } else {
                println!("{}", wkt);
                Ok(())
            }
        }
        FarmCommand::ListPlots { email } => {
            let plots = store.list_plots(&email).await?;
            output.table(plots.into_iter().map(PlotRow::from).collect())
        }
    }
}

fn writes(command: &FarmCommand) -> bool {
    !matches!(command, FarmCommand::PlotWkt { .. } | FarmCommand::ListPlots { .. })
}

fn record<T: serde::Serialize>(output: &OutputWriter, message: String, record: T) -> Result<()> {
    if output.is_json() {
        output.result(record)
    } else {
        output.success(message);
        Ok(())
    }
}

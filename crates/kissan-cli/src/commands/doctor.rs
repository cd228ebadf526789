use crate::cli::DoctorArgs;
use crate::output::OutputWriter;
use crate::output_types::DoctorCheck;
use crate::provider::with_deadline;
use anyhow::Result;
use console::style;
use kissan_core::config::{redact_url, LayeredConfig};
use kissan_imagery::earth_engine::ServiceAccountKey;
use kissan_imagery::EarthEngineClient;
use kissan_store::{MigrationStatus, PostgresConfig, PostgresStore};
use std::path::Path;

pub async fn execute(
    args: DoctorArgs,
    config_path: &Path,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let mut checks = Vec::new();

    // Config file
    checks.push(if config_path.exists() {
        DoctorCheck::pass("Config", format!("Loaded {}", config_path.display()))
    } else {
        DoctorCheck::pass("Config", format!("{} not found, using defaults", config_path.display()))
    });

    // Earth Engine key
    let key_path = &config.credentials_path.value;
    let key = ServiceAccountKey::from_file(key_path);
    match &key {
        Ok(key) => {
            let mut detail = format!("Service account {}", key.client_email);
            if args.verbose {
                detail.push_str(&format!(" ({})", key_path.display()));
            }
            checks.push(DoctorCheck::pass("Credentials", detail));
        }
        Err(e) => checks.push(DoctorCheck::fail(
            "Credentials",
            e.to_string(),
            "Set KISSAN_GEE_CREDENTIALS or pass --credentials /path/to/key.json",
        )),
    }

    // Billing project
    let project = config
        .project
        .value
        .clone()
        .or_else(|| key.as_ref().ok().and_then(|k| k.project_id.clone()));
    checks.push(match project {
        Some(project) => DoctorCheck::pass("Project", project),
        None => DoctorCheck::fail(
            "Project",
            "No Earth Engine project configured",
            "Set KISSAN_GEE_PROJECT or pass --project",
        ),
    });

    if args.online && key.is_ok() {
        let token = with_deadline(config, async {
            let client = EarthEngineClient::from_config(config)?;
            client.access_token().await?;
            Ok(client.service_account().to_string())
        })
        .await;
        checks.push(match token {
            Ok(account) => DoctorCheck::pass("Earth Engine", format!("Token issued for {}", account)),
            Err(e) => DoctorCheck::fail(
                "Earth Engine",
                e.to_string(),
                "Check that the service account is registered for Earth Engine",
            ),
        });
    }

    // Farm database and its schema
    match &config.database_url.value {
        Some(url) => checks.extend(database_checks(url).await),
        None => checks.push(DoctorCheck::pass("Database", "In-memory store (records are not persisted)")),
    }

    let passed = checks.iter().filter(|c| c.passed).count();
    let total = checks.len();

    if output.is_json() {
        return output.result(serde_json::json!({
            "checks": checks,
            "passed": passed,
            "total": total,
        }));
    }

    println!("\n{}", style("KissanSat Health Check").bold().underlined());
    println!("{}", style("═".repeat(60)).dim());
    for check in &checks {
        let icon = if check.passed { style("✓").green() } else { style("✗").red() };
        println!("{} {}: {}", icon, check.name, check.detail);
        if let Some(hint) = &check.hint {
            println!("  → {}", hint);
        }
    }
    println!("{}", style("═".repeat(60)).dim());
    println!("Overall Status: {}/{} checks passed", passed, total);

    if passed < total {
        println!("{}", style("Some issues were found. Follow the suggestions above to fix them.").yellow());
    } else {
        println!("{}", style("All checks passed!").green());
    }
    Ok(())
}

/// Connect without migrating, then report which bundled migrations are applied
async fn database_checks(url: &str) -> Vec<DoctorCheck> {
    let store = match PostgresConfig::new(url) {
        Ok(config) => PostgresStore::new(config.without_migrations()).await,
        Err(e) => Err(e.into()),
    };
    let store = match store {
        Ok(store) => store,
        Err(e) => {
            return vec![DoctorCheck::fail(
                "Database",
                e.to_string(),
                "Check DATABASE_URL and that PostGIS is installed",
            )]
        }
    };

    let connected = DoctorCheck::pass("Database", format!("Connected to {}", redact_url(url)));
    let schema = match store.migration_status().await {
        Ok(status) => schema_check(&status),
        Err(e) => DoctorCheck::fail("Schema", e.to_string(), "Check the database user's permissions"),
    };
    vec![connected, schema]
}

fn schema_check(status: &[MigrationStatus]) -> DoctorCheck {
    let applied = status.iter().filter(|m| m.applied).count();
    let summary = format!("{}/{} migrations applied", applied, status.len());
    if applied == status.len() {
        DoctorCheck::pass("Schema", summary)
    } else {
        DoctorCheck::fail(
            "Schema",
            summary,
            "Pending migrations run the next time a kissan command opens this database",
        )
    }
}

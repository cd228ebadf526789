use console::style;
use kissan_core::KissanError;
use kissan_tools::ToolError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: None, suggestions: Vec::new(), help_command: None }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }

    /// Machine-readable form for `--json`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "error",
            "message": self.message,
            "context": self.context,
            "suggestions": self.suggestions,
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Service-account key missing or unreadable
pub fn credentials_unavailable(error: &KissanError) -> CliError {
    CliError::new("Earth Engine credentials unavailable")
        .with_context(format!("Error: {}", error))
        .with_suggestion("Point to a service-account key: --credentials /path/to/key.json")
        .with_suggestion("Or set KISSAN_GEE_CREDENTIALS=/path/to/key.json")
        .with_suggestion("Or run offline with synthetic scenes: --provider stub")
        .with_help("Run: kissan doctor")
}

/// Create error for database connection failure
pub fn database_connection_failed(error: &str) -> CliError {
    CliError::new("Cannot connect to PostgreSQL")
        .with_context(format!("DATABASE_URL is not set or connection failed.\n\nError: {}", error))
        .with_suggestion("Set DATABASE_URL: export DATABASE_URL=\"postgresql://localhost/kissan\"")
        .with_suggestion("Or add to kissan.toml:\n  database_url = \"postgresql://localhost/kissan\"")
        .with_suggestion("Make sure the PostGIS extension is available: CREATE EXTENSION postgis;")
        .with_help("Run: kissan doctor")
}

/// Plot could not be resolved for the user
pub fn plot_not_found(error: &KissanError) -> CliError {
    CliError::new("Plot not found")
        .with_context(format!("Error: {}", error))
        .with_suggestion("Check the plot name and owner email: kissan farm list-plots --email <email>")
        .with_suggestion("Records in the in-memory store only live for one command; set DATABASE_URL")
        .with_help("Run: kissan farm --help")
}

/// No scenes for the date range
pub fn no_images(error: &KissanError) -> CliError {
    CliError::new("No satellite images found")
        .with_context(format!("Error: {}", error))
        .with_suggestion("Widen the date range with --start and --end")
        .with_suggestion("Check that the geometry is in lon/lat order")
        .with_help("Run: kissan image --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check kissan.toml for syntax errors")
        .with_suggestion("Inspect effective values: kissan config")
        .with_help("Run: kissan config --help")
}

/// Imagery request exceeded the configured deadline
pub fn timed_out(seconds: u64) -> CliError {
    CliError::new(format!("Imagery request timed out after {}s", seconds))
        .with_suggestion("Raise the deadline: --timeout-secs 300 or KISSAN_TIMEOUT_SECS=300")
        .with_suggestion("Narrow the date range or the plot")
}

fn from_kissan(error: &KissanError) -> CliError {
    match error {
        KissanError::CredentialsNotFound { .. } | KissanError::InvalidCredentials { .. } => {
            credentials_unavailable(error)
        }
        KissanError::UpstreamLookup { .. } => plot_not_found(error),
        KissanError::EmptyCollection { .. } => no_images(error),
        KissanError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        KissanError::ConfigMissing { key } => invalid_config(key, "not set"),
        KissanError::Database(message) => database_connection_failed(message),
        KissanError::UnsupportedIndexKind { .. } => CliError::new(error.to_string())
            .with_suggestion("Use --index NDVI or --index NDWI"),
        KissanError::InvalidDate { .. } | KissanError::InvalidDateRange { .. } => {
            CliError::new(error.to_string()).with_suggestion("Dates are YYYY-MM-DD and start <= end")
        }
        _ => CliError::new(error.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };
    if let Some(kissan) = error.downcast_ref::<KissanError>() {
        return from_kissan(kissan);
    }
    if let Some(ToolError::Domain(kissan)) = error.downcast_ref::<ToolError>() {
        return from_kissan(kissan);
    }
    if let Some(ToolError::NotFound(name)) = error.downcast_ref::<ToolError>() {
        return CliError::new(format!("Unknown tool: {}", name))
            .with_suggestion("List the available tools: kissan tools");
    }

    let message = error.to_string();
    if message.contains("Connection refused") || message.contains("could not connect") {
        database_connection_failed(&message)
    } else {
        CliError::new(format!("{:#}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kissan_errors_get_suggestions() {
        let error = anyhow::Error::new(KissanError::UnsupportedIndexKind { kind: "EVI".into() });
        let cli_error = from_anyhow(error);
        assert!(cli_error.message.contains("EVI"));
        assert_eq!(cli_error.suggestions.len(), 1);
    }

    #[test]
    fn test_tool_domain_errors_unwrap() {
        let error = anyhow::Error::new(ToolError::Domain(KissanError::UpstreamLookup {
            plot: "north field".into(),
            email: "asha@example.org".into(),
        }));
        assert_eq!(from_anyhow(error).message, "Plot not found");
    }

    #[test]
    fn test_cli_error_passes_through() {
        let error = anyhow::Error::new(timed_out(30));
        let cli_error = from_anyhow(error);
        assert!(cli_error.message.contains("30s"));
        assert_eq!(cli_error.to_json()["status"], "error");
    }
}

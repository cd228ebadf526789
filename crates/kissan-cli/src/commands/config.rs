use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use kissan_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();

    output.section("Configuration");
    output.table(rows)
}

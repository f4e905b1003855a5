use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use ipc2581_export::types::Mode;
use ipc2581_export::{Diagnostic, ExportOptions, ExportReport, Layout, Units};
use log::debug;
use serde_json::json;

use crate::OutputFormat;
use crate::utils::file as file_utils;

/// Command-line values layered over the options file
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub units: Option<Units>,
    pub mode: Option<Mode>,
    pub level: Option<u8>,
    pub step: Option<String>,
    pub timestamp: Option<String>,
    pub checksum: bool,
}

impl Overrides {
    fn resolve(self) -> Result<ExportOptions> {
        let mut options = match &self.config {
            Some(path) => ExportOptions::load(path)
                .with_context(|| format!("Failed to load export options: {:?}", path))?,
            None => ExportOptions::default(),
        };

        if let Some(units) = self.units {
            options.units = units;
        }
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if self.level.is_some() {
            options.level = self.level;
        }
        if self.step.is_some() {
            options.step_name = self.step;
        }
        if self.timestamp.is_some() {
            options.timestamp = self.timestamp;
        }
        options.checksum |= self.checksum;

        Ok(options)
    }
}

pub fn execute(
    input: &Path,
    output: Option<PathBuf>,
    overrides: Overrides,
    format: OutputFormat,
) -> Result<()> {
    let options = overrides.resolve()?;
    let layout = file_utils::load_layout_file(input)?;
    let output = output.unwrap_or_else(|| default_output_path(input));
    debug!("Exporting {:?} to {:?} in {}", input, output, options.units);

    let report = ipc2581_export::export_to_file(&layout, &options, &output)
        .with_context(|| format!("Failed to export {:?}", input))?;

    match format {
        OutputFormat::Text => output_text(&layout, &options, &report),
        OutputFormat::Json => output_json(&layout, &options, &report),
    }
}

/// `board.json` and `board.json.zst` both become `board.xml`
fn default_output_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    if path.extension().and_then(|s| s.to_str()) == Some("zst") {
        path.set_extension("");
    }
    path.with_extension("xml")
}

fn output_text(layout: &Layout, options: &ExportOptions, report: &ExportReport) -> Result<()> {
    println!(
        "{} Exported {} to {}",
        "✓".green().bold(),
        layout.design_name.bold(),
        report.path.display()
    );
    println!(
        "  {} layers, {} components, {} padstack instances, units {}",
        layout.layers.len(),
        layout.components.len(),
        layout.padstack_instances.len(),
        options.units.keyword()
    );

    if report.diagnostics.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("{} items skipped:", report.diagnostics.len())
            .yellow()
            .bold()
    );
    for diagnostic in &report.diagnostics {
        println!("  {} {}", format!("[{}]", diagnostic.stage).dimmed(), diagnostic.reason);
    }
    Ok(())
}

fn output_json(layout: &Layout, options: &ExportOptions, report: &ExportReport) -> Result<()> {
    let diagnostics: Vec<_> = report.diagnostics.iter().map(diagnostic_json).collect();
    let summary = json!({
        "design": layout.design_name,
        "output": report.path,
        "units": options.units.keyword(),
        "layers": layout.layers.len(),
        "components": layout.components.len(),
        "padstack_instances": layout.padstack_instances.len(),
        "diagnostics": diagnostics,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn diagnostic_json(diagnostic: &Diagnostic) -> serde_json::Value {
    json!({
        "stage": diagnostic.stage.as_str(),
        "message": diagnostic.reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_drops_compression_suffix() {
        assert_eq!(
            default_output_path(Path::new("out/board.json")),
            PathBuf::from("out/board.xml")
        );
        assert_eq!(
            default_output_path(Path::new("board.json.zst")),
            PathBuf::from("board.xml")
        );
    }

    #[test]
    fn flags_override_options_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        let config = dir.path().join("export.toml");
        std::fs::write(&config, "units = \"inch\"\nenterprise = \"Acme\"\n").unwrap();

        let options = Overrides {
            config: Some(config),
            units: Some(Units::Micrometer),
            checksum: true,
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(options.units, Units::Micrometer);
        assert_eq!(options.enterprise, "Acme");
        assert!(options.checksum);
        assert_eq!(options.mode, Mode::Assembly);
    }
}

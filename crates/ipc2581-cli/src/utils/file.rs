use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use ipc2581_export::Layout;

/// Read a layout description, decompressing `.zst` files on the fly
pub fn read_layout_text(path: &Path) -> Result<String> {
    if path.extension().and_then(|s| s.to_str()) == Some("zst") {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open compressed layout: {:?}", path))?;

        let mut decoder = zstd::Decoder::new(file).context("Failed to create zstd decoder")?;
        let mut content = String::new();
        decoder
            .read_to_string(&mut content)
            .context("Failed to decompress layout")?;

        Ok(content)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read layout: {:?}", path))
    }
}

/// Load and parse a layout JSON file
pub fn load_layout_file(path: &Path) -> Result<Layout> {
    let content = read_layout_text(path)?;
    Layout::from_json(&content).with_context(|| format!("Failed to parse layout: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"{"design_name": "tiny"}"#;

    #[test]
    fn reads_plain_and_compressed_layouts() {
        let dir = assert_fs::TempDir::new().unwrap();

        let plain = dir.path().join("board.json");
        std::fs::write(&plain, MINIMAL).unwrap();
        assert_eq!(load_layout_file(&plain).unwrap().design_name, "tiny");

        let packed = dir.path().join("board.json.zst");
        let mut encoder = zstd::Encoder::new(std::fs::File::create(&packed).unwrap(), 0).unwrap();
        encoder.write_all(MINIMAL.as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(read_layout_text(&packed).unwrap(), MINIMAL);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_layout_file(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.json"));
    }
}

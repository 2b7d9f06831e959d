//! Loading assets from disk and moving generated data to the GPU.

use std::path::{Path, PathBuf};

use anyhow::Context;

pub mod mesh;
pub mod texture;

/// Resolve `file_name` inside the asset directory.
pub fn asset_path(assets: &Path, file_name: &str) -> PathBuf {
    assets.join(file_name)
}

pub async fn load_binary(assets: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(assets, file_name);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = load_binary(Path::new("no-such-dir"), "nothing.png")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("nothing.png"));
    }

    #[tokio::test]
    async fn reads_relative_to_the_asset_dir() {
        let bytes = load_binary(Path::new(env!("CARGO_MANIFEST_DIR")), "Cargo.toml")
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("orrery-ngin"));
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use quarterly_core::{DocumentExtractor, PipelineConfig, TextNormalizer};

pub async fn run(config: &PipelineConfig, file: &Path) -> Result<()> {
    let extractor = DocumentExtractor::new(TextNormalizer::new(&config.normalizer)?);
    let text = extractor
        .extract(file)
        .await
        .with_context(|| format!("failed to extract {}", file.display()))?;

    println!("{text}");
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Fail when `--output` names the manifest or the credential being read.
pub fn ensure_output_not_same(output: &Path, inputs: &[&Path]) -> Result<()> {
    let target = comparable(output)?;
    if let Some(input) = inputs
        .iter()
        .map(|input| comparable(input).map(|path| (input, path)))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .find_map(|(input, path)| (path == target).then_some(input))
    {
        bail!(
            "refusing to overwrite input file {} with --output {}",
            input.display(),
            output.display()
        );
    }
    Ok(())
}

/// Absolute form of `path` for equality checks. Existing files resolve
/// symlinks; an output that does not exist yet is only anchored at the cwd.
fn comparable(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()));
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}

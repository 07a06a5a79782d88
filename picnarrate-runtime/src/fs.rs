use std::fs;
use std::path::Path;

use anyhow::Context;

pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir: {}", parent.display()))?;
    }
    Ok(())
}

/// Writes `bytes` to a sibling temp file, then swaps it into place.
pub fn write_atomic(dst: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    ensure_parent_dir(dst)?;
    let tmp = dst.with_extension("tmp");
    fs::write(&tmp, bytes).with_context(|| format!("write temp: {}", tmp.display()))?;
    replace_file(&tmp, dst)
}

/// Moves `tmp` over `dst`, keeping the previous `dst` until the move has succeeded.
pub fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let previous = dst.with_extension("bak");
    let had_previous = dst.exists();

    // Windows refuses to rename onto an existing file.
    if had_previous {
        let _ = fs::remove_file(&previous);
        fs::rename(dst, &previous)
            .with_context(|| format!("move aside {}", dst.display()))?;
    }

    match fs::rename(tmp, dst) {
        Ok(()) => {
            let _ = fs::remove_file(&previous);
            Ok(())
        }
        Err(e) => {
            if had_previous {
                let _ = fs::rename(&previous, dst);
            }
            let _ = fs::remove_file(tmp);
            Err(anyhow::Error::new(e).context(format!("replace {}", dst.display())))
        }
    }
}

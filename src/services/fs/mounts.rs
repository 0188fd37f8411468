use crate::core::errors::{Error, Result};
use crate::services::fs::listing::to_wire_dir;
use mountpoints::mountpaths;

/// Mount points of the host in wire form, deduplicated and in host order.
pub fn list_mounts() -> Result<Vec<String>> {
    let paths = mountpaths().map_err(|e| Error::Other(format!("mount points: {e:?}")))?;
    let mut roots: Vec<String> = Vec::with_capacity(paths.len());
    for path in paths {
        match path.to_str() {
            Some(path) => {
                let root = to_wire_dir(path);
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
            None => tracing::debug!("skipping non-UTF-8 mount point {:?}", path),
        }
    }
    Ok(roots)
}

use std::collections::BTreeMap;
use std::path::Path;

use sha2::{Digest, Sha256};

/// 16-hex-char SHA-256 prefix of the file's bytes, keyed in a `BTreeMap`
/// for deterministic serialization order. Missing files are simply
/// omitted — their absence is what `critical_files_exist` checks for.
pub fn file_hashes(repo_root: &Path, paths: &[String]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for rel in paths {
        let full = repo_root.join(rel);
        if let Ok(bytes) = std::fs::read(&full) {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            let digest = hasher.finalize();
            out.insert(rel.clone(), hex::encode(&digest[..8]));
        }
    }
    out
}

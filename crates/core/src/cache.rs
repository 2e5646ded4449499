use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::ast::SyntaxProvider;
use crate::error::AnalysisError;

const SCHEMA_VERSION: u32 = 1;
const MANIFEST_FILE: &str = "manifest.json";
const ARTIFACT_DIR: &str = "artifacts";

/// What a provider produced for one source text.
#[derive(Serialize, Deserialize)]
pub struct CachedAst {
    pub provider: String,
    pub ast_json: String,
}

/// Maps each source path to the content hash last stored for it.
#[derive(Serialize, Deserialize)]
struct Manifest {
    schema_version: u32,
    sources: HashMap<PathBuf, String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sources: HashMap::new(),
        }
    }
}

/// On-disk AST store. Artifacts are content addressed by the SHA-256 of the
/// source text; the manifest only remembers which hash belongs to which path.
pub struct AstCache {
    root: PathBuf,
    manifest: Manifest,
}

impl AstCache {
    pub fn open(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(root.join(ARTIFACT_DIR))
            .with_context(|| format!("Failed to create AST cache at {}", root.display()))?;

        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = match fs::read_to_string(&manifest_path) {
            Ok(text) => serde_json::from_str::<Manifest>(&text)
                .ok()
                .filter(|m| m.schema_version == SCHEMA_VERSION)
                .unwrap_or_default(),
            Err(_) => Manifest::default(),
        };
        debug!(root = %root.display(), entries = manifest.sources.len(), "opened AST cache");

        Ok(Self { root, manifest })
    }

    /// Hex SHA-256 of `contents`.
    pub fn hash_contents(contents: &str) -> String {
        format!("{:x}", Sha256::digest(contents.as_bytes()))
    }

    fn artifact_path(&self, hash: &str) -> PathBuf {
        self.root.join(ARTIFACT_DIR).join(format!("{hash}.bin"))
    }

    /// The stored AST for `path`, only if it was built from text hashing to `hash`.
    pub fn lookup(&self, path: &Path, hash: &str) -> Option<CachedAst> {
        if self.manifest.sources.get(path).map(String::as_str) != Some(hash) {
            return None;
        }
        let bytes = fs::read(self.artifact_path(hash)).ok()?;
        bincode::deserialize(&bytes).ok()
    }

    pub fn store(&mut self, path: &Path, hash: &str, artifact: &CachedAst) -> Result<()> {
        let artifact_path = self.artifact_path(hash);
        let bytes = bincode::serialize(artifact)?;
        fs::write(&artifact_path, bytes)
            .with_context(|| format!("Failed to write {}", artifact_path.display()))?;
        self.manifest
            .sources
            .insert(path.to_path_buf(), hash.to_string());
        Ok(())
    }

    /// Persist the manifest. Artifacts are written eagerly by `store`.
    pub fn flush(&self) -> Result<()> {
        let manifest_path = self.root.join(MANIFEST_FILE);
        let text = serde_json::to_string_pretty(&self.manifest)?;
        fs::write(&manifest_path, text)
            .with_context(|| format!("Failed to write {}", manifest_path.display()))
    }

    pub fn clear(&mut self) -> Result<()> {
        let artifacts = self.root.join(ARTIFACT_DIR);
        if artifacts.exists() {
            fs::remove_dir_all(&artifacts)?;
        }
        fs::create_dir_all(&artifacts)?;
        self.manifest.sources.clear();
        self.flush()
    }
}

/// Wraps a provider and serves repeated sources from an [`AstCache`].
/// Cache failures are logged; they never fail the file.
pub struct CachedProvider<P> {
    inner: P,
    cache: Mutex<AstCache>,
}

impl<P: SyntaxProvider> CachedProvider<P> {
    pub fn new(inner: P, cache: AstCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

impl<P: SyntaxProvider> SyntaxProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn provide_ast(&self, path: &Path, source: &str) -> Result<String, AnalysisError> {
        let hash = AstCache::hash_contents(source);
        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.lookup(path, &hash) {
                if hit.provider == self.inner.name() {
                    debug!(path = %path.display(), "AST cache hit");
                    return Ok(hit.ast_json);
                }
            }
        }

        let ast_json = self.inner.provide_ast(path, source)?;
        let artifact = CachedAst {
            provider: self.inner.name().to_string(),
            ast_json,
        };
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = cache.store(path, &hash, &artifact) {
            warn!(path = %path.display(), error = %e, "failed to cache AST");
        }
        Ok(artifact.ast_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl SyntaxProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn provide_ast(&self, _path: &Path, source: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!(r#"{{"nodeType":"SourceUnit","nodes":[],"len":{}}}"#, source.len()))
        }
    }

    fn temp_cache(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("solflow-test-cache-{name}"));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_content_hash_is_stable_hex() {
        let hash = AstCache::hash_contents("contract A {}");
        assert_eq!(hash, AstCache::hash_contents("contract A {}"));
        assert_ne!(hash, AstCache::hash_contents("contract B {}"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_store_survives_reopen_and_clear() {
        let dir = temp_cache("reopen");
        let mut cache = AstCache::open(dir.clone()).unwrap();

        let artifact = CachedAst {
            provider: "solc".to_string(),
            ast_json: "{}".to_string(),
        };
        let file = PathBuf::from("contracts/Vault.sol");
        let hash = AstCache::hash_contents("contract Vault {}");

        cache.store(&file, &hash, &artifact).unwrap();
        cache.flush().unwrap();

        let reopened = AstCache::open(dir.clone()).unwrap();
        assert_eq!(reopened.lookup(&file, &hash).unwrap().ast_json, "{}");

        let different = AstCache::hash_contents("contract Vault { uint x; }");
        assert!(reopened.lookup(&file, &different).is_none());

        cache.clear().unwrap();
        assert!(cache.lookup(&file, &hash).is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cached_provider_serves_unchanged_source() {
        let dir = temp_cache("provider");
        let provider = CachedProvider::new(
            CountingProvider {
                calls: AtomicUsize::new(0),
            },
            AstCache::open(dir.clone()).unwrap(),
        );
        let path = Path::new("Vault.sol");

        let first = provider.provide_ast(path, "contract Vault {}").unwrap();
        let second = provider.provide_ast(path, "contract Vault {}").unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 1);

        provider.provide_ast(path, "contract Vault { }").unwrap();
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
        provider.flush().unwrap();

        let _ = fs::remove_dir_all(&dir);
    }
}

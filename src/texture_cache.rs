//! Decoded texture cache keyed by asset id.
//!
//! Entries remember a digest of the bytes they were decoded from; a request
//! for the same id with different bytes invalidates and re-decodes.

use crate::raster;
use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

const TEXTURE_CACHE_VERSION: u8 = 1;

/// Encoded texture bytes as handed over by the asset layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureSource {
    pub asset_id: String,
    pub bytes: Vec<u8>,
}

struct CachedTexture {
    digest: String,
    image: Arc<RgbaImage>,
}

#[derive(Default)]
pub struct TextureCache {
    entries: HashMap<String, CachedTexture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, asset_id: &str) -> Option<Arc<RgbaImage>> {
        self.entries.get(asset_id).map(|entry| entry.image.clone())
    }

    pub fn invalidate(&mut self, asset_id: &str) -> bool {
        self.entries.remove(asset_id).is_some()
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|id, _| keep(id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns a decoded raster per distinct asset id.
    ///
    /// The first source listed for an id wins; later sources with the same id
    /// are ignored even when their bytes differ.
    ///
    /// Cache misses decode concurrently and are all awaited before returning.
    /// A failed decode is reported for that id only and is not cached.
    pub fn load_all<'a, I>(&mut self, sources: I) -> HashMap<String, Result<Arc<RgbaImage>, String>>
    where
        I: IntoIterator<Item = &'a TextureSource>,
    {
        let mut results = HashMap::new();
        let mut misses: Vec<(&TextureSource, String)> = Vec::new();
        let mut seen: HashMap<&str, String> = HashMap::new();

        for source in sources {
            let digest = texture_digest(&source.bytes);
            if let Some(first) = seen.get(source.asset_id.as_str()) {
                if *first != digest {
                    log::warn!(
                        "Texture {:?} listed twice with different bytes; keeping the first",
                        source.asset_id
                    );
                }
                continue;
            }
            seen.insert(source.asset_id.as_str(), digest.clone());

            match self.entries.get(&source.asset_id) {
                Some(entry) if entry.digest == digest => {
                    results.insert(source.asset_id.clone(), Ok(entry.image.clone()));
                }
                Some(_) => {
                    log::debug!("Texture {:?} changed; invalidating", source.asset_id);
                    self.entries.remove(&source.asset_id);
                    misses.push((source, digest));
                }
                None => misses.push((source, digest)),
            }
        }

        let decoded: Vec<(String, String, Result<RgbaImage, String>)> = misses
            .par_iter()
            .map(|(source, digest)| {
                let result = raster::decode(&source.bytes)
                    .map_err(|e| format!("Texture {:?}: {}", source.asset_id, e));
                (source.asset_id.clone(), digest.clone(), result)
            })
            .collect();

        for (asset_id, digest, result) in decoded {
            match result {
                Ok(image) => {
                    let image = Arc::new(image);
                    self.entries.insert(
                        asset_id.clone(),
                        CachedTexture {
                            digest,
                            image: image.clone(),
                        },
                    );
                    results.insert(asset_id, Ok(image));
                }
                Err(err) => {
                    log::warn!("{}", err);
                    results.insert(asset_id, Err(err));
                }
            }
        }

        results
    }
}

fn texture_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update([TEXTURE_CACHE_VERSION]);
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

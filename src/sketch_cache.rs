
//! Signature cache and the sketch engine that owns it.
//!
//! Computing a MinHash signature costs a full pass over the sequence per
//! comparison, so signatures are cached keyed by sequence identity and
//! sketch parameters. Identity is either a content hash of the normalized
//! sequence or a caller-supplied stable id (taxon/accession), which lets
//! repeated comparisons against large reference genomes skip rehashing
//! entirely. Eviction is least-recently-used, one entry at a time, bounded
//! by entry count and an approximate byte budget.
//!
//! `SketchEngine` pairs a cache with a `SketchBackend` chosen once at
//! construction: a candidate backend is accepted only if it passes the
//! bit-exact self-test, otherwise the engine silently falls back to the
//! pure implementation.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::errors::EngineResult;
use crate::minhash::{
    MinHashSignature, PureSketcher, SketchBackend, check_sketch_params, probe_backend,
};

/// Sequence identity half of a cache key.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum SequenceId {
    /// FNV-1a hash of the uppercased sequence.
    Content(u64),
    /// Caller-supplied stable identifier, e.g. a taxon or accession id.
    Stable(String),
}

/// Full cache key: sequence identity plus the sketch parameter family.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct SignatureKey {
    pub id: SequenceId,
    pub k: usize,
    pub num_hashes: usize,
    pub canonical: bool,
}

/// Content hash over the normalized (uppercased) sequence.
pub fn content_hash(seq: &[u8]) -> u64 {
    let mut h = 0xcbf2_9ce4_8422_2325u64;
    for &b in seq {
        h ^= b.to_ascii_uppercase() as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

struct CacheEntry {
    signature: MinHashSignature,
    bytes: usize,
    last_access: u64,
}

/// Read-only cache diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: usize,
    pub approx_bytes: usize,
}

/// Capacity-bounded LRU store for MinHash signatures.
pub struct SignatureCache {
    entries: FxHashMap<SignatureKey, CacheEntry>,
    max_entries: usize,
    max_bytes: usize,
    bytes: usize,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl SignatureCache {
    /// Cache bounded by entry count and approximate byte usage.
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        SignatureCache {
            entries: FxHashMap::default(),
            max_entries: max_entries.max(1),
            max_bytes: max_bytes.max(1),
            bytes: 0,
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a signature, refreshing its recency on a hit.
    pub fn get(&mut self, key: &SignatureKey) -> Option<&MinHashSignature> {
        self.tick += 1;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_access = self.tick;
                self.hits += 1;
                Some(&entry.signature)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a signature, then evict least-recently-used entries one at a
    /// time until both capacity bounds hold again.
    pub fn insert(&mut self, key: SignatureKey, signature: MinHashSignature) {
        self.tick += 1;
        let bytes = signature.approx_bytes();

        if let Some(old) = self.entries.insert(
            key,
            CacheEntry {
                signature,
                bytes,
                last_access: self.tick,
            },
        ) {
            self.bytes -= old.bytes;
        }
        self.bytes += bytes;

        while self.entries.len() > self.max_entries
            || (self.bytes > self.max_bytes && self.entries.len() > 1)
        {
            self.evict_lru();
        }
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            if let Some(entry) = self.entries.remove(&key) {
                self.bytes -= entry.bytes;
                debug!("Evicted cached signature for {:?}", key.id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate: if lookups > 0 {
                self.hits as f64 / lookups as f64
            } else {
                0.0
            },
            entries: self.entries.len(),
            approx_bytes: self.bytes,
        }
    }
}

/// Sketching front end: a probed backend plus the shared signature cache.
///
/// Constructed once and passed by reference to every call site; the cache
/// is the only mutable shared state in the engine.
pub struct SketchEngine {
    backend: Box<dyn SketchBackend>,
    cache: SignatureCache,
}

impl SketchEngine {
    /// Engine with the pure backend and a default-size cache.
    pub fn new() -> Self {
        SketchEngine {
            backend: Box::new(PureSketcher),
            cache: SignatureCache::new(256, 8 * 1024 * 1024),
        }
    }

    /// Engine with a candidate accelerated backend.
    ///
    /// The candidate is accepted only if it reproduces the pure
    /// implementation on the self-test; otherwise the engine falls back to
    /// `PureSketcher` and callers see no difference except latency.
    pub fn with_backend(candidate: Box<dyn SketchBackend>, cache: SignatureCache) -> Self {
        if probe_backend(candidate.as_ref()) {
            debug!("Sketch backend '{}' passed self-test.", candidate.name());
            SketchEngine {
                backend: candidate,
                cache,
            }
        } else {
            warn!(
                "Sketch backend '{}' failed self-test; falling back to pure implementation.",
                candidate.name()
            );
            SketchEngine {
                backend: Box::new(PureSketcher),
                cache,
            }
        }
    }

    pub fn backend(&self) -> &dyn SketchBackend {
        self.backend.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Cache-through signature computation.
    ///
    /// With `stable_id` the cache key is the supplied identifier, avoiding a
    /// rehash of the sequence on later calls; otherwise the key is a content
    /// hash. Returns `Ok(None)` when the sequence yields no valid k-mer.
    pub fn signature_for(
        &mut self,
        seq: &[u8],
        stable_id: Option<&str>,
        k: usize,
        num_hashes: usize,
        canonical: bool,
    ) -> EngineResult<Option<MinHashSignature>> {
        check_sketch_params(k, num_hashes)?;

        let id = match stable_id {
            Some(label) => SequenceId::Stable(label.to_string()),
            None => SequenceId::Content(content_hash(seq)),
        };
        let key = SignatureKey {
            id,
            k,
            num_hashes,
            canonical,
        };

        if let Some(sig) = self.cache.get(&key) {
            return Ok(Some(sig.clone()));
        }

        match self.backend.signature(seq, k, num_hashes, canonical) {
            Some(sig) => {
                self.cache.insert(key, sig.clone());
                Ok(Some(sig))
            }
            None => Ok(None),
        }
    }

    /// Insert a signature computed outside the engine, e.g. by parallel
    /// reference sketching, under a stable id.
    pub fn cache_signature(&mut self, stable_id: &str, signature: MinHashSignature) {
        let key = SignatureKey {
            id: SequenceId::Stable(stable_id.to_string()),
            k: signature.k(),
            num_hashes: signature.num_hashes(),
            canonical: signature.canonical(),
        };
        self.cache.insert(key, signature);
    }

    /// Estimated Jaccard via the selected backend.
    pub fn jaccard(&self, a: &MinHashSignature, b: &MinHashSignature) -> EngineResult<f64> {
        self.backend.jaccard(a, b)
    }
}

impl Default for SketchEngine {
    fn default() -> Self {
        SketchEngine::new()
    }
}

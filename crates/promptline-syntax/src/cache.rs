//! Bounded memoization of template parses.
//!
//! Parsing is a pure function of the template text, so parse results are
//! shared behind `Arc` and reused across resolution passes. The cache is an
//! explicit object owned by a rendering session, never ambient global state,
//! so tests always start from a deterministic empty cache.

use crate::template::{TemplateAst, parse_template};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

pub struct TemplateCache {
    cache: Mutex<LruCache<String, Arc<TemplateAst>>>,
}

impl TemplateCache {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1))
            .expect("capacity is clamped to at least 1");
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn with_default_size() -> Self {
        let max_entries = std::env::var("PROMPTLINE_TEMPLATE_CACHE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128);
        Self::new(max_entries)
    }

    /// Returns the parsed form of `source`, parsing and caching on first use.
    pub fn parse(&self, source: &str) -> Arc<TemplateAst> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(ast) = cache.get(source) {
                return Arc::clone(ast);
            }

            let ast = Arc::new(parse_template(source));
            cache.put(source.to_string(), Arc::clone(&ast));
            return ast;
        }

        // Poisoned lock: fall back to an uncached parse.
        Arc::new(parse_template(source))
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.lock().ok();
        CacheStats {
            entries: cache.as_ref().map(|c| c.len()).unwrap_or(0),
            max_entries: cache.as_ref().map(|c| c.cap().get()).unwrap_or(0),
        }
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::with_default_size()
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_cached() {
        let cache = TemplateCache::new(8);
        let first = cache.parse("hello {{ .Env.USER }}");
        let second = cache.parse("hello {{ .Env.USER }}");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn distinct_templates_get_distinct_entries() {
        let cache = TemplateCache::new(8);
        cache.parse("a");
        cache.parse("b");
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn eviction_respects_capacity() {
        let cache = TemplateCache::new(2);
        cache.parse("a");
        cache.parse("b");
        cache.parse("c");
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = TemplateCache::new(8);
        cache.parse("a");
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }
}

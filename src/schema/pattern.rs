//! Compiled `pattern` rules, shared by every validation pass of a schema

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Regex cache keyed by pattern source. Clones share the cache.
#[derive(Clone, Default)]
pub struct PatternCache {
    compiled: Arc<Mutex<HashMap<String, Regex>>>,
}

impl PatternCache {
    /// Compiled regex for `pattern`. Invalid patterns are not cached.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        let mut compiled = self
            .compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(re) = compiled.get(pattern) {
            return Ok(re.clone());
        }
        let re = Regex::new(pattern)?;
        compiled.insert(pattern.to_string(), re.clone());
        Ok(re)
    }

    pub fn len(&self) -> usize {
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCache")
            .field("compiled", &self.len())
            .finish()
    }
}

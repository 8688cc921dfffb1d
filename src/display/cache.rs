use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use serde::Serialize;

use super::model::{ColumnDescriptor, FieldType};

/// Number of value characters that take part in a field-type cache key.
const VALUE_PREFIX_CHARS: usize = 20;

/// Insertion-ordered map that evicts its oldest entry once full.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, value);
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::trace!("evicted oldest cache entry");
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Composite key for a field-type lookup: value kind, value prefix and the
/// field name it was found under. The tail beyond the prefix is folded into a
/// hash so long values keep distinct keys without being stored whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldTypeKey {
    kind: &'static str,
    prefix: String,
    tail_hash: u64,
    field_name: String,
}

impl FieldTypeKey {
    pub fn new(kind: &'static str, value_text: &str, field_name: Option<&str>) -> Self {
        let split = value_text
            .char_indices()
            .nth(VALUE_PREFIX_CHARS)
            .map(|(idx, _)| idx)
            .unwrap_or(value_text.len());
        let (prefix, tail) = value_text.split_at(split);
        let mut hasher = DefaultHasher::new();
        tail.hash(&mut hasher);
        Self {
            kind,
            prefix: prefix.to_string(),
            tail_hash: hasher.finish(),
            field_name: field_name.unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub field_type_entries: usize,
    pub column_entries: usize,
    pub formatted_name_entries: usize,
}

/// Memoisation shared by every display computation of one engine.
///
/// Entries are idempotent, so concurrent readers may race on inserts without
/// changing results. A poisoned lock simply disables caching.
#[derive(Debug)]
pub struct DisplayCaches {
    field_types: RwLock<BoundedCache<FieldTypeKey, FieldType>>,
    columns: RwLock<BoundedCache<String, Vec<ColumnDescriptor>>>,
    formatted_names: RwLock<BoundedCache<String, String>>,
}

impl DisplayCaches {
    pub fn new(capacity: usize) -> Self {
        Self {
            field_types: RwLock::new(BoundedCache::new(capacity)),
            columns: RwLock::new(BoundedCache::new(capacity)),
            formatted_names: RwLock::new(BoundedCache::new(capacity)),
        }
    }

    pub fn field_type(&self, key: &FieldTypeKey) -> Option<FieldType> {
        read(&self.field_types, key)
    }

    pub fn store_field_type(&self, key: FieldTypeKey, value: FieldType) {
        write(&self.field_types, key, value);
    }

    pub fn columns(&self, signature: &str) -> Option<Vec<ColumnDescriptor>> {
        read(&self.columns, &signature.to_string())
    }

    pub fn store_columns(&self, signature: String, columns: Vec<ColumnDescriptor>) {
        write(&self.columns, signature, columns);
    }

    pub fn formatted_name(&self, field_name: &str) -> Option<String> {
        read(&self.formatted_names, &field_name.to_string())
    }

    pub fn store_formatted_name(&self, field_name: String, label: String) {
        write(&self.formatted_names, field_name, label);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            field_type_entries: size(&self.field_types),
            column_entries: size(&self.columns),
            formatted_name_entries: size(&self.formatted_names),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.field_types.write() {
            cache.clear();
        }
        if let Ok(mut cache) = self.columns.write() {
            cache.clear();
        }
        if let Ok(mut cache) = self.formatted_names.write() {
            cache.clear();
        }
        tracing::debug!("display caches cleared");
    }
}

fn read<K: Eq + Hash + Clone, V: Clone>(lock: &RwLock<BoundedCache<K, V>>, key: &K) -> Option<V> {
    lock.read().ok().and_then(|cache| cache.get(key))
}

fn write<K: Eq + Hash + Clone, V: Clone>(lock: &RwLock<BoundedCache<K, V>>, key: K, value: V) {
    if let Ok(mut cache) = lock.write() {
        cache.insert(key, value);
    }
}

fn size<K: Eq + Hash + Clone, V: Clone>(lock: &RwLock<BoundedCache<K, V>>) -> usize {
    lock.read().map(|cache| cache.len()).unwrap_or(0)
}

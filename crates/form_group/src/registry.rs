//! Extension points for custom field types.
//!
//! Extensions contribute `(type, renderer)` pairs through hooks registered on
//! [`FieldExtensions`]. The hooks run at the start of every render pass against
//! a fresh [`CustomFieldRegistry`], so registrations behave as process-wide and
//! additive while the registry itself carries no identity between passes.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::descriptor::FieldDescriptor;
use crate::node::Node;

/// Renders a custom field from the original, unmodified descriptor.
pub type CustomFieldRenderer = Arc<dyn Fn(&FieldDescriptor) -> Node + Send + Sync>;

pub type CustomFieldRegistry = ItemList<CustomFieldRenderer>;

/// Contributes entries to the registry before a render pass.
pub type RegistryHook = Arc<dyn Fn(&mut CustomFieldRegistry) + Send + Sync>;

#[derive(Clone)]
struct Item<T> {
    content: T,
    priority: i32,
}

/// Keyed collection with per-entry priority.
///
/// Lookups by key (`has`/`get`) ignore priority entirely; priority only
/// affects the order returned by [`ItemList::to_vec`].
#[derive(Clone)]
pub struct ItemList<T> {
    items: IndexMap<String, Item<T>>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemList<T> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.get(key).map(|item| &item.content)
    }

    pub fn get_priority(&self, key: &str) -> Option<i32> {
        self.items.get(key).map(|item| item.priority)
    }

    /// Add an entry. An existing key is overwritten in place.
    pub fn add(&mut self, key: impl Into<String>, content: T, priority: i32) -> &mut Self {
        self.items.insert(key.into(), Item { content, priority });
        self
    }

    /// Replace content and/or priority of an existing entry. Returns false if absent.
    pub fn replace(&mut self, key: &str, content: Option<T>, priority: Option<i32>) -> bool {
        let Some(item) = self.items.get_mut(key) else {
            return false;
        };
        if let Some(content) = content {
            item.content = content;
        }
        if let Some(priority) = priority {
            item.priority = priority;
        }
        true
    }

    pub fn set_content(&mut self, key: &str, content: T) -> bool {
        self.replace(key, Some(content), None)
    }

    pub fn set_priority(&mut self, key: &str, priority: i32) -> bool {
        self.replace(key, None, Some(priority))
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.items.shift_remove(key).map(|item| item.content)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Contents ordered by descending priority; ties keep insertion order.
    pub fn to_vec(&self) -> Vec<&T> {
        let mut entries: Vec<&Item<T>> = self.items.values().collect();
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        entries.into_iter().map(|item| &item.content).collect()
    }
}

impl<T> fmt::Debug for ItemList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.items.iter().map(|(k, item)| (k, item.priority)))
            .finish()
    }
}

impl ItemList<CustomFieldRenderer> {
    /// Register a renderer for a custom field type at the default priority.
    pub fn register(
        &mut self,
        field_type: impl Into<String>,
        render: impl Fn(&FieldDescriptor) -> Node + Send + Sync + 'static,
    ) -> &mut Self {
        self.add(field_type, Arc::new(render), 0)
    }
}

/// Hooks through which extensions register custom field types.
#[derive(Clone, Default)]
pub struct FieldExtensions {
    hooks: Vec<RegistryHook>,
}

impl FieldExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(
        &mut self,
        hook: impl Fn(&mut CustomFieldRegistry) + Send + Sync + 'static,
    ) -> &mut Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn with(mut self, hook: impl Fn(&mut CustomFieldRegistry) + Send + Sync + 'static) -> Self {
        self.extend(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Build a fresh registry and run every hook against it in registration order.
    pub fn custom_field_components(&self) -> CustomFieldRegistry {
        let mut registry = CustomFieldRegistry::new();
        for hook in &self.hooks {
            hook(&mut registry);
        }
        debug!(
            hooks = self.hooks.len(),
            custom_types = registry.len(),
            "built custom field registry"
        );
        registry
    }
}

impl fmt::Debug for FieldExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldExtensions")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

//! Plugin registration and capability bookkeeping.

use std::fmt;

use thiserror::Error;

use super::OutputPlugin;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("plugin {0:?} is already registered")]
    Duplicate(String),
    #[error("unknown plugin {name:?} (available: {available})")]
    Unknown { name: String, available: String },
}

/// Optional capabilities a plugin declared at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    pub verbose: bool,
    pub pre_execute: bool,
    pub post_execute: bool,
}

impl CapabilitySet {
    fn detect(plugin: &mut dyn OutputPlugin) -> Self {
        Self {
            verbose: plugin.as_verbose().is_some(),
            pre_execute: plugin.as_pre_execute().is_some(),
            post_execute: plugin.as_post_execute().is_some(),
        }
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (self.verbose, "verbose"),
            (self.pre_execute, "pre-execute"),
            (self.post_execute, "post-execute"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();

        if names.is_empty() { f.write_str("-") } else { f.write_str(&names.join(", ")) }
    }
}

/// A registered plugin and the capabilities recorded for it.
pub struct Entry {
    pub plugin: Box<dyn OutputPlugin>,
    pub capabilities: CapabilitySet,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("plugin", &self.plugin.name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Registered plugins, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a plugin, probing its capabilities once.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register(&mut self, mut plugin: Box<dyn OutputPlugin>) -> Result<(), RegistryError> {
        if self.get(plugin.name()).is_some() {
            return Err(RegistryError::Duplicate(plugin.name().to_string()));
        }

        let capabilities = CapabilitySet::detect(plugin.as_mut());
        tracing::debug!(plugin = plugin.name(), %capabilities, "registered output plugin");
        self.entries.push(Entry { plugin, capabilities });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.plugin.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.plugin.name() == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> { self.entries.iter() }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> { self.entries.iter_mut() }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.plugin.name())
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Resolves a selection to plugin names, in the order given.
    ///
    /// Duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] for the first name not registered.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&'static str>, RegistryError> {
        let mut selected = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            let entry = self.get(name).ok_or_else(|| RegistryError::Unknown {
                name: name.to_string(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })?;
            if !selected.contains(&entry.plugin.name()) {
                selected.push(entry.plugin.name());
            }
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use clap::{ArgMatches, Command};

    use super::*;
    use crate::colour::ThemeData;
    use crate::plugin::{ExecutionContext, FileSet, PluginError, PostExecute, Verbose};

    struct Counting {
        name: &'static str,
        lookups: Arc<AtomicUsize>,
        verbose: bool,
    }

    impl Verbose for Counting {
        fn set_verbose(&mut self, verbose: bool) { self.verbose = verbose; }
    }

    #[async_trait]
    impl PostExecute for Counting {
        async fn post_execute(&self, _: &ExecutionContext, _: &[PathBuf]) -> Result<(), PluginError> {
            Ok(())
        }
    }

    impl OutputPlugin for Counting {
        fn name(&self) -> &'static str { self.name }

        fn description(&self) -> &'static str { "counting" }

        fn register_flags(&self, cmd: Command) -> Command { cmd }

        fn apply_flags(&mut self, _: &ArgMatches) {}

        fn set_output_dir(&mut self, _: Option<PathBuf>) {}

        fn default_output_dir(&self) -> PathBuf { PathBuf::from("counting") }

        fn generate(&self, _: Option<&ThemeData>) -> Result<FileSet, PluginError> {
            Ok(FileSet::new())
        }

        fn as_verbose(&mut self) -> Option<&mut dyn Verbose> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Some(self)
        }

        fn as_post_execute(&self) -> Option<&dyn PostExecute> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Some(self)
        }
    }

    fn counting(name: &'static str, lookups: &Arc<AtomicUsize>) -> Box<dyn OutputPlugin> {
        Box::new(Counting { name, lookups: Arc::clone(lookups), verbose: false })
    }

    #[test]
    fn test_capabilities_are_detected_once() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();
        registry.register(counting("a", &lookups)).unwrap();

        assert_eq!(lookups.load(Ordering::SeqCst), 2);
        let caps = registry.get("a").unwrap().capabilities;
        assert_eq!(caps, CapabilitySet { verbose: true, pre_execute: false, post_execute: true });

        let _ = registry.get("a").unwrap().capabilities;
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();
        registry.register(counting("a", &lookups)).unwrap();
        assert_eq!(
            registry.register(counting("a", &lookups)),
            Err(RegistryError::Duplicate("a".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_select_preserves_order_and_drops_duplicates() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();
        registry.register(counting("a", &lookups)).unwrap();
        registry.register(counting("b", &lookups)).unwrap();

        assert_eq!(registry.select(&["b", "a", "b"]).unwrap(), vec!["b", "a"]);
        let err = registry.select(&["c"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown plugin \"c\" (available: a, b)");
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(CapabilitySet::default().to_string(), "-");
        let caps = CapabilitySet { verbose: true, pre_execute: true, post_execute: false };
        assert_eq!(caps.to_string(), "verbose, pre-execute");
    }
}

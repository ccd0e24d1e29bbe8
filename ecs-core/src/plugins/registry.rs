// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Plugin registry
//!
//! This module provides the registry for managing plugins, including:
//! - Static registration via direct API calls
//! - Dependency resolution and circular dependency detection
//! - Version compatibility checking

use crate::ecs::Coordinator;
use crate::error::{EcsError, EcsResult};
use crate::plugins::api::{Plugin, PLUGIN_API_VERSION};
use log::{debug, warn};
use semver::Version;
use std::collections::{BTreeMap, BTreeSet};

/// Plugin registry for building plugins onto a coordinator
///
/// Plugins are built once, in dependency order. Among plugins whose
/// dependencies are satisfied, names are taken in ascending order so the
/// build order is deterministic.
///
/// A plugin whose `build` fails leaves the coordinator with the
/// registrations of every plugin built before it. The registry is then
/// aborted: further `register` and `build_all` calls fail with
/// [`EcsError::PluginBuildAborted`], and the caller should discard the
/// coordinator.
pub struct PluginRegistry {
    /// Registered plugins indexed by name
    plugins: BTreeMap<String, Box<dyn Plugin>>,
    /// Build order (topologically sorted by dependencies)
    load_order: Vec<String>,
    built: bool,
    /// Plugin whose build failed part way through `build_all`
    aborted: Option<String>,
}

impl PluginRegistry {
    /// Create a new plugin registry
    pub fn new() -> Self {
        PluginRegistry {
            plugins: BTreeMap::new(),
            load_order: Vec::new(),
            built: false,
            aborted: None,
        }
    }

    /// Register a plugin
    ///
    /// # Errors
    ///
    /// - [`EcsError::PluginsAlreadyBuilt`] after [`build_all`](Self::build_all)
    /// - [`EcsError::DuplicatePlugin`] if the name is taken
    /// - [`EcsError::IncompatiblePlugin`] if the plugin API version is incompatible
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> EcsResult<()> {
        self.ensure_not_aborted()?;
        if self.built {
            return Err(EcsError::PluginsAlreadyBuilt);
        }

        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            warn!("Plugin '{}' is already registered", name);
            return Err(EcsError::DuplicatePlugin(name));
        }

        let plugin_api_version = plugin.api_version();
        if !is_version_compatible(plugin_api_version, PLUGIN_API_VERSION) {
            warn!(
                "Plugin '{}' targets API {}, engine provides {}",
                name, plugin_api_version, PLUGIN_API_VERSION
            );
            return Err(EcsError::IncompatiblePlugin {
                plugin_api: plugin_api_version.to_string(),
                plugin: name,
                engine_api: PLUGIN_API_VERSION,
            });
        }

        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Build every registered plugin onto `coordinator`
    ///
    /// # Errors
    ///
    /// - [`EcsError::MissingPluginDependency`] for an unregistered dependency
    /// - [`EcsError::PluginDependencyCycle`] if dependencies form a cycle
    /// - The first error returned by a plugin's `build`
    pub fn build_all(&mut self, coordinator: &mut Coordinator) -> EcsResult<()> {
        self.ensure_not_aborted()?;
        if self.built {
            return Err(EcsError::PluginsAlreadyBuilt);
        }

        let mut dependencies: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, plugin) in &self.plugins {
            let deps: Vec<String> = plugin
                .dependencies()
                .iter()
                .map(|s| s.to_string())
                .collect();

            for dep in &deps {
                if !self.plugins.contains_key(dep) {
                    return Err(EcsError::MissingPluginDependency {
                        plugin: name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }

            dependencies.insert(name.clone(), deps);
        }

        self.load_order = topological_sort(&dependencies)?;

        for name in &self.load_order {
            if let Some(plugin) = self.plugins.get_mut(name) {
                if let Err(err) = plugin.build(coordinator) {
                    warn!("Failed to build plugin '{}': {}", name, err);
                    self.aborted = Some(name.clone());
                    return Err(err);
                }
                debug!("Built plugin '{}' {}", name, plugin.version());
            }
        }

        self.built = true;
        Ok(())
    }

    /// Get a plugin by name
    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|p| p.as_ref())
    }

    /// Get a mutable plugin by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Plugin + '_)> {
        self.plugins.get_mut(name).map(|p| &mut **p as &mut (dyn Plugin + '_))
    }

    /// Get the number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Check if the plugins were built
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Name of the plugin whose failed build aborted this registry
    pub fn aborted_by(&self) -> Option<&str> {
        self.aborted.as_deref()
    }

    /// Plugin names in the order they were built
    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }
}

impl PluginRegistry {
    fn ensure_not_aborted(&self) -> EcsResult<()> {
        match &self.aborted {
            Some(name) => Err(EcsError::PluginBuildAborted(name.clone())),
            None => Ok(()),
        }
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a plugin API version is compatible with the engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match (breaking changes)
/// - For major version >= 1, minor version can be less than or equal
/// - Patch version is ignored
fn is_version_compatible(plugin_version: &str, engine_version: &str) -> bool {
    let (plugin_ver, engine_ver) = match (Version::parse(plugin_version), Version::parse(engine_version)) {
        (Ok(p), Ok(e)) => (p, e),
        _ => return false,
    };

    if plugin_ver.major != engine_ver.major {
        return false;
    }

    if plugin_ver.major != 0 {
        plugin_ver.minor <= engine_ver.minor
    } else {
        plugin_ver.minor == engine_ver.minor
    }
}

/// Kahn's algorithm over the dependency graph, smallest ready name first
fn topological_sort(dependencies: &BTreeMap<String, Vec<String>>) -> EcsResult<Vec<String>> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (name, deps) in dependencies {
        *in_degree.entry(name.as_str()).or_insert(0) += deps.len();
        for dep in deps {
            in_degree.entry(dep.as_str()).or_insert(0);
            dependents.entry(dep.as_str()).or_default().push(name.as_str());
        }
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(name, _)| *name)
        .collect();

    let mut sorted = Vec::with_capacity(dependencies.len());
    while let Some(node) = ready.pop_first() {
        sorted.push(node.to_string());

        if let Some(children) = dependents.get(node) {
            for &child in children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(child);
                    }
                }
            }
        }
    }

    if sorted.len() != in_degree.len() {
        warn!("Circular dependency detected in plugin dependencies");
        return Err(EcsError::PluginDependencyCycle);
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    struct TestPlugin {
        name: String,
        api: String,
        deps: Vec<String>,
        build_count: usize,
        fail: bool,
    }

    impl TestPlugin {
        fn new(name: &str, deps: Vec<&str>) -> Self {
            TestPlugin {
                name: name.to_string(),
                api: PLUGIN_API_VERSION.to_string(),
                deps: deps.iter().map(|s| s.to_string()).collect(),
                build_count: 0,
                fail: false,
            }
        }
    }

    impl Plugin for TestPlugin {
        fn name(&self) -> &str {
            &self.name
        }

        fn version(&self) -> &str {
            "1.0.0"
        }

        fn api_version(&self) -> &str {
            &self.api
        }

        fn dependencies(&self) -> Vec<&str> {
            self.deps.iter().map(|s| s.as_str()).collect()
        }

        fn build(&mut self, _coordinator: &mut Coordinator) -> EcsResult<()> {
            if self.fail {
                return Err(EcsError::InvalidConfig("refused".to_string()));
            }
            self.build_count += 1;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn build_count(registry: &PluginRegistry, name: &str) -> usize {
        registry
            .get(name)
            .and_then(|p| p.as_any().downcast_ref::<TestPlugin>())
            .map_or(0, |p| p.build_count)
    }

    #[test]
    fn test_registry_creation() {
        let registry = PluginRegistry::new();
        assert_eq!(registry.plugin_count(), 0);
        assert!(!registry.is_built());
    }

    #[test]
    fn test_duplicate_plugin_registration() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(TestPlugin::new("test", vec![])))
            .unwrap();

        let err = registry
            .register(Box::new(TestPlugin::new("test", vec![])))
            .unwrap_err();
        assert_eq!(err, EcsError::DuplicatePlugin("test".to_string()));
        assert_eq!(registry.plugin_count(), 1);
    }

    #[test]
    fn test_incompatible_api_rejected() {
        let mut registry = PluginRegistry::new();
        let mut plugin = TestPlugin::new("old", vec![]);
        plugin.api = "0.2.0".to_string();

        let err = registry.register(Box::new(plugin)).unwrap_err();
        assert!(matches!(err, EcsError::IncompatiblePlugin { .. }));
    }

    #[test]
    fn test_dependency_order() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(TestPlugin::new("physics", vec!["core"])))
            .unwrap();
        registry
            .register(Box::new(TestPlugin::new("audio", vec![])))
            .unwrap();
        registry
            .register(Box::new(TestPlugin::new("core", vec![])))
            .unwrap();

        let mut coordinator = Coordinator::new();
        registry.build_all(&mut coordinator).unwrap();

        assert_eq!(registry.load_order(), &["audio", "core", "physics"]);
        assert_eq!(build_count(&registry, "physics"), 1);
        assert!(registry.is_built());
    }

    #[test]
    fn test_missing_dependency() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(TestPlugin::new("plugin_b", vec!["plugin_a"])))
            .unwrap();

        let err = registry.build_all(&mut Coordinator::new()).unwrap_err();
        assert_eq!(
            err,
            EcsError::MissingPluginDependency {
                plugin: "plugin_b".to_string(),
                dependency: "plugin_a".to_string(),
            }
        );
        assert!(!registry.is_built());
    }

    #[test]
    fn test_circular_dependency() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(TestPlugin::new("plugin_a", vec!["plugin_c"])))
            .unwrap();
        registry
            .register(Box::new(TestPlugin::new("plugin_b", vec!["plugin_a"])))
            .unwrap();
        registry
            .register(Box::new(TestPlugin::new("plugin_c", vec!["plugin_b"])))
            .unwrap();

        let err = registry.build_all(&mut Coordinator::new()).unwrap_err();
        assert_eq!(err, EcsError::PluginDependencyCycle);
        assert_eq!(build_count(&registry, "plugin_a"), 0);
    }

    #[test]
    fn test_build_failure_propagates() {
        let mut registry = PluginRegistry::new();
        let mut plugin = TestPlugin::new("broken", vec![]);
        plugin.fail = true;
        registry.register(Box::new(plugin)).unwrap();

        assert!(registry.build_all(&mut Coordinator::new()).is_err());
        assert!(!registry.is_built());
        assert_eq!(registry.aborted_by(), Some("broken"));
    }

    #[test]
    fn test_failed_build_cannot_be_retried() {
        let mut registry = PluginRegistry::new();
        let mut coordinator = Coordinator::new();
        registry
            .register(Box::new(TestPlugin::new("a_first", vec![])))
            .unwrap();
        let mut plugin = TestPlugin::new("b_broken", vec!["a_first"]);
        plugin.fail = true;
        registry.register(Box::new(plugin)).unwrap();

        assert!(registry.build_all(&mut coordinator).is_err());
        assert_eq!(build_count(&registry, "a_first"), 1);

        let retry = registry.build_all(&mut coordinator).unwrap_err();
        assert_eq!(retry, EcsError::PluginBuildAborted("b_broken".to_string()));
        assert_eq!(build_count(&registry, "a_first"), 1);
        assert_eq!(
            registry
                .register(Box::new(TestPlugin::new("late", vec![])))
                .unwrap_err(),
            EcsError::PluginBuildAborted("b_broken".to_string())
        );
    }

    #[test]
    fn test_no_registration_after_build() {
        let mut registry = PluginRegistry::new();
        let mut coordinator = Coordinator::new();
        registry.build_all(&mut coordinator).unwrap();

        let err = registry
            .register(Box::new(TestPlugin::new("late", vec![])))
            .unwrap_err();
        assert_eq!(err, EcsError::PluginsAlreadyBuilt);
        assert_eq!(
            registry.build_all(&mut coordinator).unwrap_err(),
            EcsError::PluginsAlreadyBuilt
        );
    }

    #[test]
    fn test_version_compatibility() {
        assert!(is_version_compatible("0.1.0", "0.1.0"));
        assert!(is_version_compatible("0.1.5", "0.1.0"));
        assert!(!is_version_compatible("0.2.0", "0.1.0"));
        assert!(is_version_compatible("1.0.0", "1.2.0"));
        assert!(!is_version_compatible("1.3.0", "1.2.0"));
        assert!(!is_version_compatible("2.0.0", "1.0.0"));
        assert!(!is_version_compatible("invalid", "1.0.0"));
    }

    #[test]
    fn test_get_mut() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(TestPlugin::new("test", vec![])))
            .unwrap();

        let plugin = registry.get_mut("test").unwrap();
        plugin
            .as_any_mut()
            .downcast_mut::<TestPlugin>()
            .unwrap()
            .build_count = 7;
        assert_eq!(build_count(&registry, "test"), 7);
        assert!(registry.get("missing").is_none());
    }
}

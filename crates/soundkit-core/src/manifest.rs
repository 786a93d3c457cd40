//! Publish manifest projection
//!
//! The manifest written into the published package is derived from the
//! project's own `package.json`, never copied: only a fixed set of fields is
//! carried over, and entry points plus the `exports` map are injected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::files;

// =============================================================================
// Authoring Manifest
// =============================================================================

/// The fields of the authoring-time `package.json` that get published
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub repository: Option<Value>,
    #[serde(default)]
    pub dependencies: Option<Map<String, Value>>,
}

impl ProjectManifest {
    pub fn load(path: &Path) -> Result<Self> {
        files::read_json(path)
    }

    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(path, e))
    }
}

// =============================================================================
// Exports
// =============================================================================

/// Resolution conditions of one exported subpath
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportConditions {
    pub types: String,
    pub require: String,
    pub import: String,
}

impl ExportConditions {
    /// Conditions for a module path without extension, e.g. `./index`
    pub fn for_module(stem: &str) -> Self {
        Self {
            types: format!("{stem}.d.ts"),
            require: format!("{stem}.js"),
            import: format!("{stem}.mjs"),
        }
    }
}

impl From<ExportConditions> for Value {
    fn from(conditions: ExportConditions) -> Self {
        json!({
            "types": conditions.types,
            "require": conditions.require,
            "import": conditions.import,
        })
    }
}

/// `exports` map, serialized in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Exports(Map<String, Value>);

impl Exports {
    /// Root entry, a named bindings subpath and a wildcard fallback
    pub fn standard(bindings: &str) -> Self {
        let mut exports = Self::default();
        exports.insert(".", ExportConditions::for_module("./index"));
        exports.insert(
            format!("./{bindings}"),
            ExportConditions::for_module(&format!("./{bindings}/index")),
        );
        exports.insert("./*", ExportConditions::for_module("./*"));
        exports
    }

    pub fn insert(&mut self, subpath: impl Into<String>, conditions: ExportConditions) {
        self.0.insert(subpath.into(), conditions.into());
    }

    pub fn subpaths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

// =============================================================================
// Publish Manifest
// =============================================================================

/// The `package.json` written into the published package
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishManifest {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub main: String,
    pub module: String,
    pub types: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Value>,
    pub side_effects: bool,
    pub exports: Exports,
}

impl PublishManifest {
    /// Project an authoring manifest into a publishable one
    pub fn project(source: &ProjectManifest, bindings: &str) -> Self {
        Self {
            name: source.name.clone(),
            version: source.version.clone(),
            author: source.author.clone(),
            homepage: source.homepage.clone(),
            main: "index.js".to_string(),
            module: "index.mjs".to_string(),
            types: "index.d.ts".to_string(),
            dependencies: source.dependencies.clone(),
            license: source.license.clone(),
            repository: source.repository.clone(),
            side_effects: false,
            exports: Exports::standard(bindings),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::parse("package.json", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORING: &str = r#"{
        "name": "@soundxyz/sound-protocol",
        "version": "1.4.0",
        "author": "Sound.xyz",
        "homepage": "https://sound.xyz",
        "license": "GPL-3.0-or-later",
        "repository": { "type": "git", "url": "https://github.com/soundxyz/sound-protocol" },
        "main": "src/index.ts",
        "scripts": { "build": "bob-ts" },
        "dependencies": { "@ethersproject/abi": "^5.7.0", "ethers": "^5.7.0" },
        "devDependencies": { "typescript": "^4.8.0" },
        "exports": { "./internal": "./internal.js" }
    }"#;

    fn published() -> Value {
        let source = ProjectManifest::from_json(Path::new("package.json"), AUTHORING).unwrap();
        let manifest = PublishManifest::project(&source, "typechain");
        serde_json::from_str(&manifest.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_authoring_only_fields_are_dropped() {
        let manifest = published();
        let object = manifest.as_object().unwrap();

        assert!(!object.contains_key("devDependencies"));
        assert!(!object.contains_key("scripts"));
        assert_eq!(manifest["main"], "index.js");
    }

    #[test]
    fn test_projected_fields() {
        let manifest = published();

        assert_eq!(manifest["name"], "@soundxyz/sound-protocol");
        assert_eq!(manifest["version"], "1.4.0");
        assert_eq!(manifest["license"], "GPL-3.0-or-later");
        assert_eq!(manifest["repository"]["type"], "git");
        assert_eq!(manifest["dependencies"]["ethers"], "^5.7.0");
        assert_eq!(manifest["sideEffects"], false);
        assert_eq!(manifest["module"], "index.mjs");
        assert_eq!(manifest["types"], "index.d.ts");
    }

    #[test]
    fn test_exports_replace_source_exports() {
        let manifest = published();

        assert_eq!(
            manifest["exports"],
            json!({
                ".": {
                    "types": "./index.d.ts",
                    "require": "./index.js",
                    "import": "./index.mjs"
                },
                "./typechain": {
                    "types": "./typechain/index.d.ts",
                    "require": "./typechain/index.js",
                    "import": "./typechain/index.mjs"
                },
                "./*": {
                    "types": "./*.d.ts",
                    "require": "./*.js",
                    "import": "./*.mjs"
                }
            })
        );
    }

    #[test]
    fn test_exports_keep_order() {
        let exports = Exports::standard("typechain");
        let subpaths: Vec<_> = exports.subpaths().collect();
        assert_eq!(subpaths, vec![".", "./typechain", "./*"]);

        let rendered = serde_json::to_string(&exports).unwrap();
        assert!(rendered.starts_with(r#"{".":{"types":"./index.d.ts","require""#));
    }

    #[test]
    fn test_exports_are_not_sorted() {
        let mut exports = Exports::default();
        exports.insert("./zeta", ExportConditions::for_module("./zeta"));
        exports.insert("./alpha", ExportConditions::for_module("./alpha"));

        let rendered = serde_json::to_string(&exports).unwrap();
        assert!(rendered.find("./zeta").unwrap() < rendered.find("./alpha").unwrap());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let source = ProjectManifest::from_json(
            Path::new("package.json"),
            r#"{ "name": "minimal", "version": "0.0.1" }"#,
        )
        .unwrap();
        let json = PublishManifest::project(&source, "typechain")
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("author").is_none());
        assert!(value.get("dependencies").is_none());
        assert!(value.get("exports").is_some());
    }

    #[test]
    fn test_missing_version_is_parse_error() {
        let result = ProjectManifest::from_json(Path::new("package.json"), r#"{ "name": "x" }"#);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }
}

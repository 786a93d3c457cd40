//! Interface id constants
//!
//! The compiler toolchain writes interface ids to a JSON file. Consumers of the
//! published package get them as a typed constant module instead, so the JSON
//! is re-emitted as `export const interfaceIds = {...} as const`.

use std::path::Path;

use alloy::primitives::FixedBytes;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::files;

/// Mapping of interface name to its 4-byte selector, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceIds {
    ids: Map<String, Value>,
}

impl InterfaceIds {
    /// Load and validate the interface id table
    pub fn load(path: &Path) -> Result<Self> {
        let content = files::read_to_string(path)?;
        Self::from_json(path, &content)
    }

    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        let ids: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| Error::parse(path, e))?;

        for (name, selector) in &ids {
            let valid = selector
                .as_str()
                .is_some_and(|s| s.parse::<FixedBytes<4>>().is_ok());
            if !valid {
                return Err(Error::parse(
                    path,
                    format!("{name} is not a 4-byte selector: {selector}"),
                ));
            }
        }

        Ok(Self { ids })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).and_then(Value::as_str)
    }

    /// Render the constant module. The output depends only on the parsed table.
    pub fn render_module(&self) -> String {
        let json = serde_json::to_string(&self.ids).unwrap_or_default();
        format!("export const interfaceIds = {json} as const")
    }

    /// Write the constant module, creating its directory if needed
    pub fn write_module(&self, path: &Path) -> Result<()> {
        files::write_ensuring_parent(path, &self.render_module())
    }
}

/// Read the JSON table at `source` and freeze it into a module at `module`
pub fn freeze(source: &Path, module: &Path) -> Result<InterfaceIds> {
    let ids = InterfaceIds::load(source)?;
    ids.write_module(module)?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TABLE: &str = r#"{
        "ISoundEditionV1": "0x50899e54",
        "IMinterModule": "0x37c74bd8",
        "IMerkleDropMinter": "0x89691c4c"
    }"#;

    #[test]
    fn test_render_module() {
        let ids = InterfaceIds::from_json(Path::new("ids.json"), TABLE).unwrap();
        assert_eq!(
            ids.render_module(),
            r#"export const interfaceIds = {"ISoundEditionV1":"0x50899e54","IMinterModule":"0x37c74bd8","IMerkleDropMinter":"0x89691c4c"} as const"#
        );
    }

    #[test]
    fn test_values_are_not_transformed() {
        let ids = InterfaceIds::from_json(
            Path::new("ids.json"),
            r#"{ "ISuperMinter": "0x1459AD68" }"#,
        )
        .unwrap();
        assert_eq!(ids.get("ISuperMinter"), Some("0x1459AD68"));
    }

    #[test]
    fn test_rendered_object_parses_back_to_source() {
        let ids = InterfaceIds::from_json(Path::new("ids.json"), TABLE).unwrap();
        let rendered = ids.render_module();
        let object = rendered
            .strip_prefix("export const interfaceIds = ")
            .and_then(|s| s.strip_suffix(" as const"))
            .unwrap();

        let reparsed: Value = serde_json::from_str(object).unwrap();
        let original: Value = serde_json::from_str(TABLE).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_rejects_non_selector_values() {
        let too_long = InterfaceIds::from_json(
            Path::new("ids.json"),
            r#"{ "IFoo": "0x50899e5400" }"#,
        );
        assert!(matches!(too_long, Err(Error::Parse { .. })));

        let not_string =
            InterfaceIds::from_json(Path::new("ids.json"), r#"{ "IFoo": 1234 }"#);
        assert!(matches!(not_string, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_rejects_non_object() {
        let result = InterfaceIds::from_json(Path::new("ids.json"), r#"["0x50899e54"]"#);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src/json/interfaceIds.json");
        let module = dir.path().join("src/interfaceIds.ts");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, TABLE).unwrap();

        let ids = freeze(&source, &module).unwrap();
        assert_eq!(ids.len(), 3);
        let first = std::fs::read(&module).unwrap();

        freeze(&source, &module).unwrap();
        assert_eq!(std::fs::read(&module).unwrap(), first);
    }

    #[test]
    fn test_freeze_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = freeze(
            &dir.path().join("interfaceIds.json"),
            &dir.path().join("interfaceIds.ts"),
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}

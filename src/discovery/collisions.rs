//! Module identifier collision detection

use std::collections::HashMap;
use std::path::Path;

use super::{DiscoveredFile, Discovery};
use crate::error::{Result, module::collision};

impl Discovery {
    /// Module identifier a file is addressed by
    ///
    /// A configured include alias overrides the declared identifier. Files
    /// outside any module have no identifier.
    pub fn effective_module_id(&self, file: &DiscoveredFile) -> Option<String> {
        if let Some(module) = &file.module {
            if let Some(alias) = self.config.alias_for(module.path()) {
                return Some(alias.to_string());
            }
        }

        let declared = match &file.module {
            Some(module) => Some(module.name()),
            None => file.manifest().and_then(|m| m.module_id()),
        }?;

        (!declared.is_empty()).then(|| declared.to_string())
    }

    /// Fail if two distinct module directories share an effective identifier
    ///
    /// Files that failed to parse or carry no identifier are ignored.
    pub fn check_module_collisions(&self, files: &[DiscoveredFile]) -> Result<()> {
        let mut seen: HashMap<String, &DiscoveredFile> = HashMap::new();

        for file in files {
            if file.error().is_some() {
                continue;
            }
            let Some(id) = self.effective_module_id(file) else {
                continue;
            };

            match seen.get(&id) {
                Some(first) if module_dir(first) != module_dir(file) => {
                    return Err(collision(id, describe(first), describe(file)));
                }
                Some(_) => {}
                None => {
                    seen.insert(id, file);
                }
            }
        }

        Ok(())
    }
}

fn module_dir(file: &DiscoveredFile) -> &Path {
    file.module
        .as_ref()
        .map_or(file.path.as_path(), |module| module.path())
}

fn describe(file: &DiscoveredFile) -> String {
    let dir = module_dir(file).display();
    match &file.parent_module {
        Some(parent) => format!("{dir} (vendored in {})", parent.name()),
        None => dir.to_string(),
    }
}

use std::path::Path;

use anyhow::{Context, Result};

use crate::plan::Plan;

impl Plan {
    /// Serialize the plan (districts, summary and, when recorded, the step trace) as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("[Plan.to_json] Failed to serialize plan")
    }

    /// Write the plan as JSON to a file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("[Plan.write_json] Failed to write {}", path.display()))
    }
}

//! Animation recipes: JSON configuration and built-in presets.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::WingbeatResult;

/// Recipe data model.
pub mod model;
/// Built-in recipes.
pub mod presets;

use model::Recipe;

/// Read, parse and validate a recipe file.
pub fn load_recipe(path: &Path) -> WingbeatResult<Recipe> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read recipe '{}'", path.display()))?;
    let recipe = Recipe::from_json(&text)?;
    recipe.validate()?;
    tracing::debug!(path = %path.display(), frames = recipe.num_frames, "loaded recipe");
    Ok(recipe)
}

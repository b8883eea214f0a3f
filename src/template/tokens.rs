use regex::{NoExpand, RegexBuilder};

use crate::foundation::error::{ShelfError, ShelfResult};

pub const SCENE_TOKEN: &str = "<scene>";
pub const RENDER_LAYER_TOKEN: &str = "<renderlayer>";

/// Replace every occurrence of `token`, ignoring ASCII case.
pub fn replace_token_ci(text: &str, token: &str, replacement: &str) -> ShelfResult<String> {
    if token.is_empty() {
        return Err(ShelfError::validation("token must be non-empty"));
    }
    let re = RegexBuilder::new(&regex::escape(token))
        .case_insensitive(true)
        .build()
        .map_err(|e| ShelfError::validation(format!("token '{token}': {e}")))?;
    Ok(re.replace_all(text, NoExpand(replacement)).into_owned())
}

/// Values substituted into output-path templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenValues {
    pub scene: String,
    pub render_layer: String,
}

impl TokenValues {
    /// Resolve `<scene>` and `<renderlayer>` in a template, both case-insensitively.
    pub fn resolve(&self, template: &str) -> ShelfResult<String> {
        let out = replace_token_ci(template, SCENE_TOKEN, &self.scene)?;
        replace_token_ci(&out, RENDER_LAYER_TOKEN, &self.render_layer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/tokens.rs"]
mod tests;

use std::collections::HashMap;
use std::io::Cursor;

use crate::AppResult;

/// A template for AI prompts that supports variable substitution.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Decode a prompt embedded with `include_zstd!`.
    pub fn from_zstd(compressed: &[u8]) -> AppResult<Self> {
        let raw = zstd::decode_all(Cursor::new(compressed))?;
        Ok(Self::new(String::from_utf8(raw)?))
    }

    /// Render the template by replacing `{{key}}` with the corresponding value.
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        let mut output = self.template.clone();
        for (k, v) in vars {
            let placeholder = format!("{{{{{}}}}}", k);
            output = output.replace(&placeholder, v);
        }
        output
    }
}

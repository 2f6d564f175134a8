//! Multi-language string catalogs

/// Language code to text. The `en` entry is mandatory and acts as the fallback.
pub type Catalog = &'static [(&'static str, &'static str)];

pub const DEFAULT_LANGUAGE: &str = "en";

/// Resolves a catalog to the active language.
pub trait Localizer: Send + Sync {
    fn language(&self) -> &str;

    fn localize(&self, catalog: Catalog) -> String {
        lookup(catalog, self.language()).to_string()
    }
}

/// Picks `language`, then the default language, then the first entry.
pub fn lookup(catalog: Catalog, language: &str) -> &'static str {
    let primary = language.split(['-', '_']).next().unwrap_or(language);

    catalog
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(language) || code.eq_ignore_ascii_case(primary))
        .or_else(|| catalog.iter().find(|(code, _)| *code == DEFAULT_LANGUAGE))
        .or_else(|| catalog.first())
        .map(|(_, text)| *text)
        .unwrap_or("")
}

/// Localizer bound to one language for the whole process.
#[derive(Debug, Clone)]
pub struct StaticLocalizer {
    language: String,
}

impl StaticLocalizer {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().to_lowercase(),
        }
    }
}

impl Default for StaticLocalizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl Localizer for StaticLocalizer {
    fn language(&self) -> &str {
        &self.language
    }
}

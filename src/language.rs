use std::fmt;

use crate::error::{Result, VidlingoError};

/// Languages offered out of the box: display label and the English name sent
/// to the translation model.
pub const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
    ("Türkçe", "Turkish"),
    ("İngilizce", "English"),
    ("Fransızca", "French"),
    ("Almanca", "German"),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    label: String,
    name: String,
}

impl Language {
    pub fn new<L: Into<String>, N: Into<String>>(label: L, name: N) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
        }
    }

    /// Look a token up in the built-in catalog by label or name, ignoring
    /// case. Unknown tokens become a language labelled with its own name.
    pub fn resolve(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let wanted = fold(token);
        let found = BUILTIN_LANGUAGES
            .iter()
            .find(|(label, name)| fold(label) == wanted || fold(name) == wanted);

        Some(match found {
            Some((label, name)) => Self::new(*label, *name),
            None => Self::new(token, token),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name passed to the translation model and used as result key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix for download file names: `{label}_{name}`
    pub fn file_prefix(&self) -> String {
        format!("{}_{}", self.label, self.name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label == self.name {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.label, self.name)
        }
    }
}

/// Case-insensitive comparison key. Turkish dotted and dotless `i` fold to a
/// plain `i` so `ingilizce` finds `İngilizce`.
fn fold(text: &str) -> String {
    text.replace(['İ', 'ı'], "i").to_lowercase()
}

/// Names end up in download file names, so they must stay a single path
/// component.
fn check_file_safe(language: &Language) -> Result<()> {
    let unsafe_part = |part: &str| part.contains(['/', '\\', '\0']) || part.contains("..");
    if unsafe_part(language.label()) || unsafe_part(language.name()) {
        return Err(VidlingoError::Validation(format!(
            "Language name cannot contain path separators or '..': {}",
            language.name()
        )));
    }
    Ok(())
}

pub fn catalog() -> Vec<Language> {
    BUILTIN_LANGUAGES
        .iter()
        .map(|(label, name)| Language::new(*label, *name))
        .collect()
}

/// Distinct target languages in the order the caller chose them.
///
/// An empty selection is representable; the pipeline rejects it before any
/// work starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSelection {
    languages: Vec<Language>,
}

impl LanguageSelection {
    pub fn new(languages: Vec<Language>) -> Result<Self> {
        for (i, language) in languages.iter().enumerate() {
            check_file_safe(language)?;
            let key = fold(language.name());
            if languages[..i].iter().any(|earlier| fold(earlier.name()) == key) {
                return Err(VidlingoError::Validation(format!(
                    "Language selected more than once: {}",
                    language.name()
                )));
            }
        }

        Ok(Self { languages })
    }

    /// Parse a comma-separated list such as `"English, Türkçe"`.
    pub fn parse(list: &str) -> Result<Self> {
        let languages = list.split(',').filter_map(Language::resolve).collect();
        Self::new(languages)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Language> {
        self.languages.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.languages.iter().any(|language| language.name() == name)
    }
}

impl<'a> IntoIterator for &'a LanguageSelection {
    type Item = &'a Language;
    type IntoIter = std::slice::Iter<'a, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.languages.iter()
    }
}

use std::fmt;

/// One of the three operator-configured input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathField {
    Text,
    Lexicon,
    Stopwords,
}

impl PathField {
    pub const ALL: [PathField; 3] = [PathField::Text, PathField::Lexicon, PathField::Stopwords];

    /// Human-readable name used in prompts and error reports
    pub fn label(self) -> &'static str {
        match self {
            PathField::Text => "text file",
            PathField::Lexicon => "lexicon file",
            PathField::Stopwords => "stopwords file",
        }
    }
}

impl fmt::Display for PathField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three input paths. An empty string means "not set yet".
///
/// Lives inside [`ConfigStore`](crate::state::ConfigStore) for the whole
/// process; everything else only ever sees a [`ConfigSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub text_path: String,
    pub lexicon_path: String,
    pub stopword_path: String,
}

impl Configuration {
    pub fn get(&self, field: PathField) -> &str {
        match field {
            PathField::Text => &self.text_path,
            PathField::Lexicon => &self.lexicon_path,
            PathField::Stopwords => &self.stopword_path,
        }
    }

    pub fn set(&mut self, field: PathField, value: String) {
        match field {
            PathField::Text => self.text_path = value,
            PathField::Lexicon => self.lexicon_path = value,
            PathField::Stopwords => self.stopword_path = value,
        }
    }
}

/// All three paths observed together under the store lock.
pub type ConfigSnapshot = Configuration;

impl ConfigSnapshot {
    /// Fields that are still empty, in menu order.
    pub fn missing_fields(&self) -> Vec<PathField> {
        PathField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

use serde::{Deserialize, Serialize};

/// Vocabulary entry as the quiz read model sees it: the word plus its example
/// sentences, denormalized into one record. Word CRUD and enrichment live in
/// the admin backend, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    pub word_id: String,
    pub text: String,
    pub translation: Option<String>,
    pub language: String,
    pub sentences: Vec<WordSentence>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordSentence {
    pub sentence_id: String,
    pub text: String,
    pub translation: Option<String>,
}

impl Word {
    /// Quiz rounds are built from words carrying exactly two sentences.
    pub fn is_quizzable(&self) -> bool {
        self.sentences.len() == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(id: &str) -> WordSentence {
        WordSentence {
            sentence_id: id.to_string(),
            text: format!("sentence {}", id),
            translation: None,
        }
    }

    #[test]
    fn test_is_quizzable_requires_exactly_two_sentences() {
        let mut word = Word {
            word_id: "w1".to_string(),
            text: "haus".to_string(),
            translation: Some("house".to_string()),
            language: "de".to_string(),
            sentences: vec![sentence("s1")],
        };
        assert!(!word.is_quizzable());

        word.sentences.push(sentence("s2"));
        assert!(word.is_quizzable());

        word.sentences.push(sentence("s3"));
        assert!(!word.is_quizzable());
    }
}

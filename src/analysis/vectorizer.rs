// * TF-IDF Vectorizer
// * Unigram + bigram bag of words over lower-cased word tokens, English stop words
// * removed, vocabulary capped by corpus frequency, rows L2-normalized.

use crate::analysis::errors::ClusteringError;
use crate::config::constants::MAX_TFIDF_FEATURES;
use ndarray::Array2;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

// * Runs of two or more word characters; punctuation splits tokens
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

// * Common English function words excluded from the vocabulary
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down",
    "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how",
    "however", "ie", "if", "in", "inc", "indeed", "into", "is", "it", "its", "itself", "just",
    "last", "latter", "least", "less", "ltd", "many", "may", "me", "meanwhile", "might", "mine",
    "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
    "never", "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "please", "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she",
    "should", "since", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "them", "themselves", "then",
    "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "this", "those", "though", "through", "throughout", "thru", "thus", "to",
    "together", "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via",
    "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which",
    "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Vectorizer settings
#[derive(Debug, Clone)]
pub struct TfidfConfig {
    pub max_features: usize,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Inclusive n-gram range
    pub ngram_range: (usize, usize),
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: MAX_TFIDF_FEATURES,
            min_df: 1,
            ngram_range: (1, 2),
        }
    }
}

/// Document-term matrix plus the vocabulary its columns refer to
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Column terms in alphabetical order
    pub vocabulary: Vec<String>,
    /// One L2-normalized row per document
    pub rows: Array2<f64>,
}

impl TfidfMatrix {
    pub fn n_documents(&self) -> usize {
        self.rows.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TfidfConfig) -> Self {
        Self { config }
    }

    /// Lower-cased word tokens with stop words removed
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !STOP_WORDS.contains(t))
            .map(str::to_string)
            .collect()
    }

    /// All n-grams of a document in the configured range
    pub fn ngrams(&self, text: &str) -> Vec<String> {
        let tokens = Self::tokenize(text);
        let (min_n, max_n) = self.config.ngram_range;
        let mut grams = Vec::new();

        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            grams.extend(tokens.windows(n).map(|w| w.join(" ")));
        }

        grams
    }

    /// Fits the vocabulary on `corpus` and returns its TF-IDF rows
    pub fn fit_transform<S: AsRef<str>>(&self, corpus: &[S]) -> Result<TfidfMatrix, ClusteringError> {
        let n_docs = corpus.len();
        let counts: Vec<HashMap<String, usize>> = corpus
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for gram in self.ngrams(doc.as_ref()) {
                    *tf.entry(gram).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        // * term -> (corpus frequency, document frequency)
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for tf in &counts {
            for (term, count) in tf {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        let mut candidates: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .filter(|(_, (_, df))| *df >= self.config.min_df)
            .map(|(term, (cf, df))| (term, cf, df))
            .collect();

        if candidates.is_empty() {
            return Err(ClusteringError::EmptyVocabulary);
        }

        // * Keep the most frequent terms; ties resolve alphabetically
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(self.config.max_features.max(1));
        candidates.sort_by(|a, b| a.0.cmp(b.0));

        let vocabulary: Vec<String> = candidates.iter().map(|(t, _, _)| t.to_string()).collect();
        let idf: Vec<f64> = candidates
            .iter()
            .map(|(_, _, df)| ((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0)
            .collect();
        let column: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let mut rows = Array2::<f64>::zeros((n_docs, vocabulary.len()));
        for (i, tf) in counts.iter().enumerate() {
            for (term, count) in tf {
                if let Some(&j) = column.get(term.as_str()) {
                    rows[[i, j]] = *count as f64 * idf[j];
                }
            }

            let norm = rows.row(i).mapv(|v| v * v).sum().sqrt();
            if norm > 0.0 {
                rows.row_mut(i).mapv_inplace(|v| v / norm);
            }
        }

        tracing::debug!(documents = n_docs, features = vocabulary.len(), "TF-IDF matrix built");

        Ok(TfidfMatrix { vocabulary, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = TfidfVectorizer::tokenize("The AI platform for a Fintech x");
        assert_eq!(tokens, vec!["ai", "platform", "fintech"]);
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        let tokens = TfidfVectorizer::tokenize("don't buy 3.5 x2 Café-Génie");
        assert_eq!(tokens, vec!["don", "buy", "x2", "café", "génie"]);
    }

    #[test]
    fn test_ngrams_include_bigrams() {
        let grams = TfidfVectorizer::new().ngrams("solar battery storage");
        assert_eq!(
            grams,
            vec!["solar", "battery", "storage", "solar battery", "battery storage"]
        );
    }

    #[test]
    fn test_rows_are_l2_normalized() {
        let corpus = ["Acme solar energy", "Beta payments bank", "Gamma solar payments"];

        let matrix = TfidfVectorizer::new().fit_transform(&corpus).unwrap();

        assert_eq!(matrix.n_documents(), 3);
        for row in matrix.rows.rows() {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_max_features_respected() {
        let vectorizer = TfidfVectorizer::with_config(TfidfConfig {
            max_features: 3,
            ..Default::default()
        });
        let corpus = ["alpha beta gamma delta", "alpha beta epsilon", "alpha zeta"];

        let matrix = vectorizer.fit_transform(&corpus).unwrap();

        assert_eq!(matrix.n_features(), 3);
        // * alpha (3) and beta (2) are the most frequent, then "alpha beta" (2)
        assert_eq!(matrix.vocabulary, vec!["alpha", "alpha beta", "beta"]);
    }

    #[test]
    fn test_stop_word_only_corpus_is_empty_vocabulary() {
        let result = TfidfVectorizer::new().fit_transform(&["the and of", "a an"]);
        assert!(matches!(result, Err(ClusteringError::EmptyVocabulary)));
    }
}

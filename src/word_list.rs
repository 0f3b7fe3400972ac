use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::FillResult;

/// The words available for filling, bucketed by length in characters. Within a bucket, a word's
/// position is its `WordId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words_by_length: BTreeMap<usize, Vec<String>>,
}

impl WordList {
    /// Build a word list from already-normalized words, keeping their order within each length.
    pub fn from_words<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut word_list = WordList::default();
        for word in words {
            word_list.push(word.into());
        }
        word_list
    }

    /// Parse a word list file: one entry per line, optionally followed by `;` and a score, which
    /// is ignored. Entries are trimmed and lowercased and blank lines are skipped.
    pub fn parse(contents: &str) -> WordList {
        WordList::from_words(contents.lines().filter_map(|line| {
            let word = line.split(';').next().unwrap_or("").trim();
            if word.is_empty() {
                None
            } else {
                Some(word.to_lowercase())
            }
        }))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> FillResult<WordList> {
        let path = path.as_ref();
        let word_list = WordList::parse(&fs::read_to_string(path)?);
        debug!("Loaded {} words from {}", word_list.len(), path.display());
        Ok(word_list)
    }

    fn push(&mut self, word: String) {
        let length = word.chars().count();
        self.words_by_length.entry(length).or_default().push(word);
    }

    pub fn words_by_length(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.words_by_length
    }

    pub fn words_of_length(&self, length: usize) -> &[String] {
        self.words_by_length.get(&length).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.words_by_length.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::WordList;

    #[test]
    fn test_parse_groups_by_length_and_drops_scores() {
        let word_list = WordList::parse(indoc! {"
            Cat;50
            at

            bat;20
              tab
            arabs;10
        "});

        assert_eq!(word_list.len(), 5);
        assert_eq!(word_list.words_of_length(2), ["at"]);
        assert_eq!(word_list.words_of_length(3), ["cat", "bat", "tab"]);
        assert_eq!(word_list.words_of_length(5), ["arabs"]);
        assert!(word_list.words_of_length(4).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let word_list = WordList::from_words(["at", "at"]);
        assert_eq!(word_list.words_of_length(2), ["at", "at"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(WordList::parse("\n\n;3\n").is_empty());
    }
}

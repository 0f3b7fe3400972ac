use std::collections::{BTreeMap, HashMap};

use bit_set::BitSet;
use log::debug;
use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::types::{Letter, WordId};
use crate::word_list::WordList;
use crate::MAX_SLOT_LENGTH;

/// Number of distinct letters the lexicon indexes.
pub const ALPHABET_SIZE: usize = 26;

/// Map a character to its letter index, if it's part of the alphabet.
pub fn letter_index(c: char) -> Option<Letter> {
    if c.is_ascii_lowercase() {
        Some(c as u8 - b'a')
    } else {
        None
    }
}

pub fn letter_char(letter: Letter) -> char {
    (b'a' + letter) as char
}

/// A struct representing a word that can be chosen for a slot of its length.
#[derive(Debug, Clone)]
pub struct Word {
    pub string: String,
    pub letters: SmallVec<[Letter; MAX_SLOT_LENGTH]>,
}

/// For one character position within a word class, the set of word ids having each letter there.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    letters: [BitSet; ALPHABET_SIZE],
}

impl PositionIndex {
    fn with_capacity(word_count: usize) -> PositionIndex {
        PositionIndex {
            letters: std::array::from_fn(|_| BitSet::with_capacity(word_count)),
        }
    }

    pub fn words_with(&self, letter: Letter) -> &BitSet {
        &self.letters[letter as usize]
    }
}

/// All words of one length, along with one `PositionIndex` per character position.
#[derive(Debug, Clone)]
pub struct WordClass {
    pub length: usize,
    pub words: Vec<Word>,
    pub positions: Vec<PositionIndex>,
}

impl WordClass {
    fn build(length: usize, strings: &[String]) -> Result<WordClass, ConfigError> {
        if length == 0 || strings.is_empty() {
            return Err(ConfigError::EmptyLengthClass { length });
        }

        let mut positions: Vec<PositionIndex> =
            (0..length).map(|_| PositionIndex::with_capacity(strings.len())).collect();
        let mut words: Vec<Word> = Vec::with_capacity(strings.len());

        for (word_id, string) in strings.iter().enumerate() {
            let letters = string
                .chars()
                .map(|c| {
                    letter_index(c).ok_or_else(|| ConfigError::UnsupportedCharacter {
                        word: string.clone(),
                        character: c,
                    })
                })
                .collect::<Result<SmallVec<[Letter; MAX_SLOT_LENGTH]>, _>>()?;

            if letters.len() != length {
                panic!("Word {string:?} filed under length {length}");
            }

            for (position, &letter) in letters.iter().enumerate() {
                positions[position].letters[letter as usize].insert(word_id);
            }

            words.push(Word { string: string.clone(), letters });
        }

        Ok(WordClass { length, words, positions })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Bit-indexed lexicon answering "which words of length L have letter c at position p".
#[derive(Debug, Clone)]
pub struct Lexicon {
    classes: HashMap<usize, WordClass>,
    empty: BitSet,
}

impl Lexicon {
    pub fn build(words_by_length: &BTreeMap<usize, Vec<String>>) -> Result<Lexicon, ConfigError> {
        if words_by_length.values().all(Vec::is_empty) {
            return Err(ConfigError::EmptyWordList);
        }

        let mut classes = HashMap::with_capacity(words_by_length.len());
        for (&length, strings) in words_by_length {
            classes.insert(length, WordClass::build(length, strings)?);
        }

        debug!(
            "Indexed {} words in {} length classes",
            classes.values().map(WordClass::len).sum::<usize>(),
            classes.len()
        );

        Ok(Lexicon { classes, empty: BitSet::new() })
    }

    pub fn from_word_list(word_list: &WordList) -> Result<Lexicon, ConfigError> {
        Lexicon::build(word_list.words_by_length())
    }

    pub fn has_length(&self, length: usize) -> bool {
        self.classes.contains_key(&length)
    }

    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.classes.keys().copied()
    }

    /// The word class for `length`. Asking for a length with no words is a programming error.
    pub fn word_class(&self, length: usize) -> &WordClass {
        self.classes
            .get(&length)
            .unwrap_or_else(|| panic!("No words of length {length} in lexicon"))
    }

    pub fn class_size(&self, length: usize) -> usize {
        self.word_class(length).len()
    }

    pub fn word(&self, length: usize, word_id: WordId) -> &Word {
        &self.word_class(length).words[word_id]
    }

    /// The ids of words of `length` with `letter` at `position`. Characters outside the alphabet
    /// match nothing.
    pub fn candidates_with_letter(&self, length: usize, position: usize, letter: char) -> &BitSet {
        match letter_index(letter) {
            Some(letter) => self.words_with_letter(length, position, letter),
            None => {
                // Still validate the length and position so misuse fails the same way.
                self.position_index(length, position);
                &self.empty
            }
        }
    }

    pub fn words_with_letter(&self, length: usize, position: usize, letter: Letter) -> &BitSet {
        self.position_index(length, position).words_with(letter)
    }

    fn position_index(&self, length: usize, position: usize) -> &PositionIndex {
        let class = self.word_class(length);
        class.positions.get(position).unwrap_or_else(|| {
            panic!("Position {position} is out of range for words of length {length}")
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bit_set::BitSet;

    use crate::error::ConfigError;
    use crate::word_list::WordList;

    use super::{letter_char, letter_index, Lexicon};

    fn build(words: &[&str]) -> Lexicon {
        Lexicon::from_word_list(&WordList::from_words(words.iter().copied()))
            .expect("Failed to build lexicon")
    }

    fn strings(lexicon: &Lexicon, length: usize, set: &BitSet) -> Vec<String> {
        set.iter().map(|word_id| lexicon.word(length, word_id).string.clone()).collect()
    }

    #[test]
    fn test_candidates_with_letter() {
        let lexicon = build(&["aaa", "aba", "aaah", "aaas", "aaabatteries"]);

        assert_eq!(strings(&lexicon, 4, lexicon.candidates_with_letter(4, 3, 's')), ["aaas"]);
        assert_eq!(
            strings(&lexicon, 4, lexicon.candidates_with_letter(4, 0, 'a')),
            ["aaah", "aaas"]
        );
        assert_eq!(
            strings(&lexicon, 3, lexicon.candidates_with_letter(3, 0, 'a')),
            ["aaa", "aba"]
        );
        assert_eq!(strings(&lexicon, 3, lexicon.candidates_with_letter(3, 1, 'b')), ["aba"]);
        assert_eq!(
            strings(&lexicon, 12, lexicon.candidates_with_letter(12, 11, 's')),
            ["aaabatteries"]
        );
    }

    #[test]
    fn test_missing_letter_is_empty() {
        let lexicon = build(&["cat", "bat"]);

        assert!(lexicon.candidates_with_letter(3, 0, 'z').is_empty());
        assert!(lexicon.candidates_with_letter(3, 2, 'A').is_empty());
        assert!(lexicon.candidates_with_letter(3, 1, '?').is_empty());
    }

    #[test]
    fn test_index_matches_words_exactly() {
        let words = ["cat", "bat", "rat", "tab", "at", "arabs"];
        let lexicon = build(&words);

        for length in lexicon.lengths().collect::<Vec<_>>() {
            let class = lexicon.word_class(length);
            assert_eq!(class.positions.len(), length);

            for position in 0..length {
                for c in 'a'..='z' {
                    let expected: BitSet = class
                        .words
                        .iter()
                        .enumerate()
                        .filter(|(_, word)| word.string.chars().nth(position) == Some(c))
                        .map(|(word_id, _)| word_id)
                        .collect();
                    assert_eq!(lexicon.candidates_with_letter(length, position, c), &expected);
                }
            }
        }
    }

    #[test]
    fn test_build_errors() {
        assert_eq!(
            Lexicon::build(&BTreeMap::new()).unwrap_err(),
            ConfigError::EmptyWordList
        );

        let mut words_by_length = BTreeMap::new();
        words_by_length.insert(3, vec!["cat".to_string()]);
        words_by_length.insert(4, vec![]);
        assert_eq!(
            Lexicon::build(&words_by_length).unwrap_err(),
            ConfigError::EmptyLengthClass { length: 4 }
        );

        assert_eq!(
            Lexicon::from_word_list(&WordList::from_words(["c4t"])).unwrap_err(),
            ConfigError::UnsupportedCharacter { word: "c4t".to_string(), character: '4' }
        );
    }

    #[test]
    #[should_panic(expected = "No words of length 7")]
    fn test_unindexed_length_panics() {
        build(&["cat"]).candidates_with_letter(7, 0, 'a');
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_position_out_of_range_panics() {
        build(&["cat"]).candidates_with_letter(3, 3, 'a');
    }

    #[test]
    fn test_letter_round_trip() {
        assert_eq!(letter_index('a'), Some(0));
        assert_eq!(letter_index('z'), Some(25));
        assert_eq!(letter_index('Z'), None);
        assert_eq!(letter_char(2), 'c');
    }
}

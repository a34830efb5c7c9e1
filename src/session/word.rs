use std::fmt;

/// A word to be typed: lowercase letters plus an optional trailing punctuation mark.
///
/// `display_text` is what the typist must enter; `score_text` is the letters-only view
/// that letter statistics are computed over.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Word {
    letters: String,
    punctuation: Option<char>,
}

impl Word {
    pub fn new(letters: impl Into<String>) -> Self {
        Self {
            letters: letters.into(),
            punctuation: None,
        }
    }

    pub fn with_punctuation(mut self, mark: char) -> Self {
        self.punctuation = Some(mark);
        self
    }

    pub fn score_text(&self) -> &str {
        &self.letters
    }

    pub fn punctuation(&self) -> Option<char> {
        self.punctuation
    }

    pub fn display_text(&self) -> String {
        let mut text = self.letters.clone();
        text.extend(self.punctuation);
        text
    }

    /// Length of the typed form, in characters.
    pub fn display_len(&self) -> usize {
        self.letters.chars().count() + usize::from(self.punctuation.is_some())
    }

    /// Length that counts toward a round's character budget.
    pub fn score_len(&self) -> usize {
        self.letters.chars().count()
    }

    /// Expected character at `pos` of the typed form.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        let letters = self.score_len();
        if pos < letters {
            self.letters.chars().nth(pos)
        } else if pos == letters {
            self.punctuation
        } else {
            None
        }
    }

    /// Expected letter at `pos`, or `None` when `pos` falls on punctuation or past the end.
    pub fn letter_at(&self, pos: usize) -> Option<char> {
        self.letters
            .chars()
            .nth(pos)
            .filter(|ch| ch.is_ascii_lowercase())
    }

    pub fn first_char(&self) -> Option<char> {
        self.char_at(0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)?;
        if let Some(mark) = self.punctuation {
            write!(f, "{mark}")?;
        }
        Ok(())
    }
}

impl From<&str> for Word {
    fn from(text: &str) -> Self {
        Word::new(text)
    }
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const COUNT: usize = 2;
    pub const ALL: [Hand; Hand::COUNT] = [Hand::Left, Hand::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Hand::Left => "Left",
            Hand::Right => "Right",
        }
    }
}

/// The eight touch-typing fingers. Thumbs never strike letters and are not modelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Finger {
    LeftPinky,
    LeftRing,
    LeftMiddle,
    LeftIndex,
    RightIndex,
    RightMiddle,
    RightRing,
    RightPinky,
}

impl Finger {
    pub const COUNT: usize = 8;
    pub const ALL: [Finger; Finger::COUNT] = [
        Finger::LeftPinky,
        Finger::LeftRing,
        Finger::LeftMiddle,
        Finger::LeftIndex,
        Finger::RightIndex,
        Finger::RightMiddle,
        Finger::RightRing,
        Finger::RightPinky,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn hand(self) -> Hand {
        if self.index() < 4 {
            Hand::Left
        } else {
            Hand::Right
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Finger::LeftPinky => "L Pinky",
            Finger::LeftRing => "L Ring",
            Finger::LeftMiddle => "L Middle",
            Finger::LeftIndex => "L Index",
            Finger::RightIndex => "R Index",
            Finger::RightMiddle => "R Middle",
            Finger::RightRing => "R Ring",
            Finger::RightPinky => "R Pinky",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Row {
    Top,
    Home,
    Bottom,
}

impl Row {
    pub const COUNT: usize = 3;
    pub const ALL: [Row; Row::COUNT] = [Row::Top, Row::Home, Row::Bottom];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Row::Top => "Top",
            Row::Home => "Home",
            Row::Bottom => "Bottom",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyAssignment {
    pub finger: Finger,
    pub row: Row,
}

impl KeyAssignment {
    pub fn new(finger: Finger, row: Row) -> Self {
        Self { finger, row }
    }

    pub fn hand(&self) -> Hand {
        self.finger.hand()
    }
}

/// Standard QWERTY touch-typing assignment for the 26 lowercase letters.
/// Anything else (punctuation, digits, uppercase, space) has no assignment.
pub fn qwerty_assignment(ch: char) -> Option<KeyAssignment> {
    use Finger::*;
    use Row::*;

    let assignment = match ch {
        'q' => KeyAssignment::new(LeftPinky, Top),
        'a' => KeyAssignment::new(LeftPinky, Home),
        'z' => KeyAssignment::new(LeftPinky, Bottom),
        'w' => KeyAssignment::new(LeftRing, Top),
        's' => KeyAssignment::new(LeftRing, Home),
        'x' => KeyAssignment::new(LeftRing, Bottom),
        'e' => KeyAssignment::new(LeftMiddle, Top),
        'd' => KeyAssignment::new(LeftMiddle, Home),
        'c' => KeyAssignment::new(LeftMiddle, Bottom),
        'r' | 't' => KeyAssignment::new(LeftIndex, Top),
        'f' | 'g' => KeyAssignment::new(LeftIndex, Home),
        'v' | 'b' => KeyAssignment::new(LeftIndex, Bottom),
        'y' | 'u' => KeyAssignment::new(RightIndex, Top),
        'h' | 'j' => KeyAssignment::new(RightIndex, Home),
        'n' | 'm' => KeyAssignment::new(RightIndex, Bottom),
        'i' => KeyAssignment::new(RightMiddle, Top),
        'k' => KeyAssignment::new(RightMiddle, Home),
        'o' => KeyAssignment::new(RightRing, Top),
        'l' => KeyAssignment::new(RightRing, Home),
        'p' => KeyAssignment::new(RightPinky, Top),
        _ => return None,
    };
    Some(assignment)
}

pub fn finger_for(ch: char) -> Option<Finger> {
    qwerty_assignment(ch).map(|a| a.finger)
}

pub fn hand_for(ch: char) -> Option<Hand> {
    qwerty_assignment(ch).map(|a| a.hand())
}

pub fn row_for(ch: char) -> Option<Row> {
    qwerty_assignment(ch).map(|a| a.row)
}

/// True when both characters are struck by the same finger.
/// Unassigned characters never form a same-finger bigram.
pub fn is_same_finger_bigram(a: char, b: char) -> bool {
    matches!((finger_for(a), finger_for(b)), (Some(fa), Some(fb)) if fa == fb)
}

pub fn is_same_hand(a: char, b: char) -> bool {
    matches!((hand_for(a), hand_for(b)), (Some(ha), Some(hb)) if ha == hb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_has_an_assignment() {
        for ch in 'a'..='z' {
            assert!(qwerty_assignment(ch).is_some(), "missing assignment for {ch}");
        }
    }

    #[test]
    fn non_letters_are_unassigned() {
        for ch in [' ', '.', ',', ';', '1', 'A', 'é'] {
            assert!(qwerty_assignment(ch).is_none(), "{ch:?} should be unassigned");
        }
    }

    #[test]
    fn rows_match_physical_layout() {
        for ch in "qwertyuiop".chars() {
            assert_eq!(row_for(ch), Some(Row::Top));
        }
        for ch in "asdfghjkl".chars() {
            assert_eq!(row_for(ch), Some(Row::Home));
        }
        for ch in "zxcvbnm".chars() {
            assert_eq!(row_for(ch), Some(Row::Bottom));
        }
    }

    #[test]
    fn hands_split_at_the_index_fingers() {
        for ch in "qwertasdfgzxcvb".chars() {
            assert_eq!(hand_for(ch), Some(Hand::Left));
        }
        for ch in "yuiophjklnm".chars() {
            assert_eq!(hand_for(ch), Some(Hand::Right));
        }
    }

    #[test]
    fn same_finger_bigrams() {
        assert!(is_same_finger_bigram('b', 'r'));
        assert!(is_same_finger_bigram('j', 'u'));
        assert!(is_same_finger_bigram('e', 'd'));
        assert!(is_same_finger_bigram('a', 'a'));
        assert!(!is_same_finger_bigram('t', 'h'));
        assert!(!is_same_finger_bigram('a', ' '));
        assert!(!is_same_finger_bigram('.', '.'));
    }

    #[test]
    fn same_hand_requires_both_assigned() {
        assert!(is_same_hand('a', 's'));
        assert!(!is_same_hand('a', 'l'));
        assert!(!is_same_hand('a', ','));
    }

    #[test]
    fn indices_are_dense() {
        for (i, finger) in Finger::ALL.iter().enumerate() {
            assert_eq!(finger.index(), i);
        }
        for (i, row) in Row::ALL.iter().enumerate() {
            assert_eq!(row.index(), i);
        }
        assert_eq!(Finger::LeftIndex.hand(), Hand::Left);
        assert_eq!(Finger::RightIndex.hand(), Hand::Right);
    }
}

//! Static book catalog.
//!
//! The 66 books of the Protestant canon in canonical order with their chapter
//! counts. Names match what chapter sources expect in URLs (`"1 Samuel"`,
//! `"Song of Solomon"`) and are the names chapters are cached under.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Book {
    pub name: &'static str,
    pub chapters: u32,
    pub testament: Testament,
}

impl Book {
    /// Ordered chapter range `1..=chapters`.
    pub fn chapter_range(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.chapters
    }
}

const OLD_TESTAMENT: [(&str, u32); 39] = [
    ("Genesis", 50),
    ("Exodus", 40),
    ("Leviticus", 27),
    ("Numbers", 36),
    ("Deuteronomy", 34),
    ("Joshua", 24),
    ("Judges", 21),
    ("Ruth", 4),
    ("1 Samuel", 31),
    ("2 Samuel", 24),
    ("1 Kings", 22),
    ("2 Kings", 25),
    ("1 Chronicles", 29),
    ("2 Chronicles", 36),
    ("Ezra", 10),
    ("Nehemiah", 13),
    ("Esther", 10),
    ("Job", 42),
    ("Psalms", 150),
    ("Proverbs", 31),
    ("Ecclesiastes", 12),
    ("Song of Solomon", 8),
    ("Isaiah", 66),
    ("Jeremiah", 52),
    ("Lamentations", 5),
    ("Ezekiel", 48),
    ("Daniel", 12),
    ("Hosea", 14),
    ("Joel", 3),
    ("Amos", 9),
    ("Obadiah", 1),
    ("Jonah", 4),
    ("Micah", 7),
    ("Nahum", 3),
    ("Habakkuk", 3),
    ("Zephaniah", 3),
    ("Haggai", 2),
    ("Zechariah", 14),
    ("Malachi", 4),
];

const NEW_TESTAMENT: [(&str, u32); 27] = [
    ("Matthew", 28),
    ("Mark", 16),
    ("Luke", 24),
    ("John", 21),
    ("Acts", 28),
    ("Romans", 16),
    ("1 Corinthians", 16),
    ("2 Corinthians", 13),
    ("Galatians", 6),
    ("Ephesians", 6),
    ("Philippians", 4),
    ("Colossians", 4),
    ("1 Thessalonians", 5),
    ("2 Thessalonians", 3),
    ("1 Timothy", 6),
    ("2 Timothy", 4),
    ("Titus", 3),
    ("Philemon", 1),
    ("Hebrews", 13),
    ("James", 5),
    ("1 Peter", 5),
    ("2 Peter", 3),
    ("1 John", 5),
    ("2 John", 1),
    ("3 John", 1),
    ("Jude", 1),
    ("Revelation", 22),
];

/// Every book in canonical order.
pub fn books() -> impl Iterator<Item = Book> {
    let old = OLD_TESTAMENT.iter().map(|&(name, chapters)| Book {
        name,
        chapters,
        testament: Testament::Old,
    });
    let new = NEW_TESTAMENT.iter().map(|&(name, chapters)| Book {
        name,
        chapters,
        testament: Testament::New,
    });
    old.chain(new)
}

/// Case-insensitive lookup; surrounding whitespace is ignored.
pub fn find_book(name: &str) -> Option<Book> {
    let wanted = name.trim();
    books().find(|book| book.name.eq_ignore_ascii_case(wanted))
}

pub fn total_chapters() -> u32 {
    books().map(|book| book.chapters).sum()
}

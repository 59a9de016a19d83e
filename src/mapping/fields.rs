//! Zotero field name -> library field name translation table

/// Library fields that have a differently named Zotero counterpart.
///
/// Zotero fields whose names already match the library (`title`, `url`,
/// `volume`, `pages`, ...) are not listed; they pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Abstract,
    Journal,
    JournalAbbreviation,
    Doi,
    Type,
    Isbn,
    Issn,
    Note,
    BookTitle,
    Series,
    School,
    UrlDate,
    ShortTitle,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 13] = [
        CanonicalField::Abstract,
        CanonicalField::Journal,
        CanonicalField::JournalAbbreviation,
        CanonicalField::Doi,
        CanonicalField::Type,
        CanonicalField::Isbn,
        CanonicalField::Issn,
        CanonicalField::Note,
        CanonicalField::BookTitle,
        CanonicalField::Series,
        CanonicalField::School,
        CanonicalField::UrlDate,
        CanonicalField::ShortTitle,
    ];

    /// Key used in the library record
    pub const fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Abstract => "abstract",
            CanonicalField::Journal => "journal",
            CanonicalField::JournalAbbreviation => "journal_abbrev",
            CanonicalField::Doi => "doi",
            CanonicalField::Type => "type",
            CanonicalField::Isbn => "isbn",
            CanonicalField::Issn => "issn",
            CanonicalField::Note => "note",
            CanonicalField::BookTitle => "booktitle",
            CanonicalField::Series => "series",
            CanonicalField::School => "school",
            CanonicalField::UrlDate => "urldate",
            CanonicalField::ShortTitle => "shorttitle",
        }
    }

    /// Key the connector sends for this field
    pub const fn source_key(self) -> &'static str {
        match self {
            CanonicalField::Abstract => "abstractNote",
            CanonicalField::Journal => "publicationTitle",
            CanonicalField::JournalAbbreviation => "journalAbbreviation",
            CanonicalField::Doi => "DOI",
            CanonicalField::Type => "itemType",
            CanonicalField::Isbn => "ISBN",
            CanonicalField::Issn => "ISSN",
            CanonicalField::Note => "extra",
            CanonicalField::BookTitle => "bookTitle",
            CanonicalField::Series => "seriesTitle",
            CanonicalField::School => "university",
            CanonicalField::UrlDate => "accessDate",
            CanonicalField::ShortTitle => "shortTitle",
        }
    }

    pub fn from_source_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.source_key() == key)
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// No two entries may share a source key or a canonical key.
const fn table_is_unique() -> bool {
    let all = CanonicalField::ALL;
    let mut i = 0;
    while i < all.len() {
        let mut j = i + 1;
        while j < all.len() {
            if str_eq(all[i].source_key(), all[j].source_key())
                || str_eq(all[i].as_str(), all[j].as_str())
            {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(table_is_unique(), "duplicate entry in field table");

// ********* Input data structures ***********

use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use std::fmt::Display;

/// The years in which the manifestos were published.
///
/// The year of a record is a closed, discrete domain: a record outside of
/// these years is a data-integrity problem.
pub const MANIFESTO_YEARS: [u16; 5] = [2004, 2009, 2014, 2019, 2024];

/// The identifier of a party, for example `BJP` or `INC`.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct PartyId(pub String);

impl PartyId {
    pub fn new(name: &str) -> PartyId {
        PartyId(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of a party table: the annotated content of one manifesto for a given year.
#[derive(PartialEq, Debug, Clone)]
pub struct ManifestoRecord {
    pub year: u16,
    /// Comma-joined domain names.
    pub domains: String,
    /// Comma-joined subcategory names.
    pub topic_subcategories: String,
    /// Comma-joined short topic phrases.
    pub summary_topics: String,
    /// Serialized sequence of (entity text, entity type) pairs, as written by the annotator.
    /// It is untrusted and only ever read through the literal parser in `entities`.
    pub ner: String,
    pub text: String,
    /// Number of mentions for each category. All the records of a store share the same keys.
    pub scores: BTreeMap<String, f64>,
}

impl ManifestoRecord {
    pub fn score(&self, category: &str) -> Option<f64> {
        self.scores.get(category).cloned()
    }

    /// The content of one of the comma-joined fields.
    pub fn field(&self, field: TokenField) -> &str {
        match field {
            TokenField::Domains => self.domains.as_str(),
            TokenField::TopicSubcategories => self.topic_subcategories.as_str(),
            TokenField::SummaryTopics => self.summary_topics.as_str(),
        }
    }
}

/// Maps one subcategory (a category column name) to the domain that owns it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TaxonomyEntry {
    pub subcategory: String,
    pub domain: String,
}

impl TaxonomyEntry {
    pub fn new(subcategory: &str, domain: &str) -> TaxonomyEntry {
        TaxonomyEntry {
            subcategory: subcategory.to_string(),
            domain: domain.to_string(),
        }
    }
}

/// The domain <-> subcategory mapping table.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Taxonomy {
    // subcategory -> owning domain
    owners: HashMap<String, String>,
    // In order of first appearance in the table.
    domains: Vec<String>,
}

impl Taxonomy {
    /// Builds the mapping. Repeated identical rows are accepted, but a subcategory
    /// may not be owned by two different domains.
    pub fn from_entries(entries: &[TaxonomyEntry]) -> AnalyticsResult<Taxonomy> {
        let mut owners: HashMap<String, String> = HashMap::new();
        let mut domains: Vec<String> = Vec::new();
        let mut seen_domains: HashSet<String> = HashSet::new();
        for entry in entries.iter() {
            let subcategory = entry.subcategory.trim().to_string();
            let domain = entry.domain.trim().to_string();
            match owners.get(&subcategory) {
                Some(existing) if *existing != domain => {
                    return Err(AnalyticsError::ConflictingTaxonomyEntry {
                        subcategory,
                        first: existing.clone(),
                        second: domain,
                    });
                }
                Some(_) => {}
                None => {
                    owners.insert(subcategory, domain.clone());
                }
            }
            if seen_domains.insert(domain.clone()) {
                domains.push(domain);
            }
        }
        Ok(Taxonomy { owners, domains })
    }

    pub fn domain_of(&self, subcategory: &str) -> Option<&str> {
        self.owners.get(subcategory).map(|d| d.as_str())
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    /// The subcategories owned by a domain, in lexicographic order.
    pub fn subcategories_of(&self, domain: &str) -> Vec<&str> {
        let mut res: Vec<&str> = self
            .owners
            .iter()
            .filter_map(|(sub, owner)| {
                if owner == domain {
                    Some(sub.as_str())
                } else {
                    None
                }
            })
            .collect();
        res.sort_unstable();
        res
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// The records of one party, in table order.
#[derive(PartialEq, Debug, Clone)]
pub struct PartyCorpus {
    pub party: PartyId,
    pub records: Vec<ManifestoRecord>,
}

/// Holds the party tables and the taxonomy. It is read-only once built,
/// see [crate::builder::CorpusBuilder].
#[derive(PartialEq, Debug, Clone)]
pub struct CorpusStore {
    pub(crate) parties: Vec<PartyCorpus>,
    pub(crate) taxonomy: Taxonomy,
    // The closed enumeration of category columns, sorted.
    pub(crate) categories: Vec<String>,
}

impl CorpusStore {
    pub fn parties(&self) -> &[PartyCorpus] {
        &self.parties
    }

    pub fn party_ids(&self) -> Vec<PartyId> {
        self.parties.iter().map(|pc| pc.party.clone()).collect()
    }

    pub fn party(&self, party: &PartyId) -> AnalyticsResult<&PartyCorpus> {
        self.parties
            .iter()
            .find(|pc| pc.party == *party)
            .ok_or_else(|| AnalyticsError::UnknownParty(party.0.clone()))
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

// ******** Output data structures *********

/// (token, count) pairs, by non-increasing count.
pub type Ranking = Vec<(String, u64)>;

/// (year, total) pairs, by strictly increasing year.
pub type TrendSeries = Vec<(u16, f64)>;

/// Aggregated values per domain, by non-increasing total.
/// Only the domains that received a non-zero contribution are present.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DomainProfile {
    pub totals: Vec<(String, f64)>,
}

impl DomainProfile {
    /// The first `n` domains. The order is already the display order.
    pub fn top(&self, n: usize) -> DomainProfile {
        DomainProfile {
            totals: self.totals.iter().take(n).cloned().collect(),
        }
    }

    pub fn get(&self, domain: &str) -> Option<f64> {
        self.totals
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, v)| *v)
    }

    pub fn total(&self) -> f64 {
        self.totals.iter().map(|(_, v)| *v).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// The outcome of a search over the raw text.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct SearchHits {
    /// Number of rows in which the term appears at least once.
    pub matching_rows: usize,
    /// Number of non-overlapping matches across all the rows.
    pub occurrences: usize,
}

/// Errors that prevent an aggregation from completing.
#[derive(PartialEq, Debug, Clone)]
pub enum AnalyticsError {
    /// The requested category is not one of the score columns.
    UnknownCategory(String),
    /// The requested domain does not appear in the taxonomy.
    UnknownDomain(String),
    UnknownParty(String),
    /// A subcategory has no owning domain: the taxonomy table is out of sync
    /// with the category columns.
    MissingTaxonomyEntry { subcategory: String },
    ConflictingTaxonomyEntry {
        subcategory: String,
        first: String,
        second: String,
    },
    /// A record has a year outside of [MANIFESTO_YEARS].
    YearOutOfDomain { year: u16 },
    DuplicateParty(String),
    /// The category columns of a party table differ from the other tables.
    MismatchedCategories {
        party: String,
        missing: Vec<String>,
        extra: Vec<String>,
    },
    EmptySearchTerm,
    InvalidSearchTerm(String),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl Error for AnalyticsError {}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyticsError::UnknownCategory(c) => write!(f, "unknown category {:?}", c),
            AnalyticsError::UnknownDomain(d) => write!(f, "unknown domain {:?}", d),
            AnalyticsError::UnknownParty(p) => write!(f, "unknown party {:?}", p),
            AnalyticsError::MissingTaxonomyEntry { subcategory } => write!(
                f,
                "data integrity: subcategory {:?} has no entry in the taxonomy",
                subcategory
            ),
            AnalyticsError::ConflictingTaxonomyEntry {
                subcategory,
                first,
                second,
            } => write!(
                f,
                "data integrity: subcategory {:?} is mapped to both {:?} and {:?}",
                subcategory, first, second
            ),
            AnalyticsError::YearOutOfDomain { year } => write!(
                f,
                "data integrity: year {} is not one of {:?}",
                year, MANIFESTO_YEARS
            ),
            AnalyticsError::DuplicateParty(p) => write!(f, "party {:?} was loaded twice", p),
            AnalyticsError::MismatchedCategories {
                party,
                missing,
                extra,
            } => write!(
                f,
                "data integrity: category columns of {:?} differ (missing: {:?}, extra: {:?})",
                party, missing, extra
            ),
            AnalyticsError::EmptySearchTerm => write!(f, "the search term is empty"),
            AnalyticsError::InvalidSearchTerm(msg) => write!(f, "invalid search term: {}", msg),
        }
    }
}

// ********* Configuration **********

/// The comma-joined multi-value fields of a record.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TokenField {
    Domains,
    TopicSubcategories,
    SummaryTopics,
}

/// Where the subcategory values of a domain roll-up come from.
///
/// - ScoreColumns sums the per-row category score columns.
/// - SubcategoryFrequency counts the tokens of the free-text subcategory field.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ValueSource {
    ScoreColumns,
    SubcategoryFrequency,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SearchMode {
    /// Literal substring, case-insensitive.
    Substring,
    /// Literal word delimited by word boundaries, case-insensitive.
    WholeWord,
}

/// Inclusive year interval. An interval with `lo > hi` is valid and matches nothing.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct YearRange {
    pub lo: u16,
    pub hi: u16,
}

impl YearRange {
    /// The full year domain.
    pub const ALL: YearRange = YearRange {
        lo: MANIFESTO_YEARS[0],
        hi: MANIFESTO_YEARS[MANIFESTO_YEARS.len() - 1],
    };

    pub fn new(lo: u16, hi: u16) -> YearRange {
        YearRange { lo, hi }
    }

    pub fn contains(&self, year: u16) -> bool {
        self.lo <= year && year <= self.hi
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }
}

/// All the parameters of one dashboard run.
///
/// The configuration is immutable: every change of a filter builds a new value
/// and runs the pipeline again.
#[derive(PartialEq, Debug, Clone)]
pub struct DashboardConfig {
    pub year_range: YearRange,
    /// Overrides `year_range` with the full year domain.
    pub show_all_years: bool,
    /// When set, every party of `selected_parties` is processed. Otherwise only
    /// `selected_party` is.
    pub compare_mode: bool,
    pub selected_parties: Vec<PartyId>,
    pub selected_party: PartyId,
    pub selected_domain: Option<String>,
    pub selected_category: Option<String>,
    /// Added to the default stop list of the entity and word rankings.
    pub stop_words: Vec<String>,
    pub search_word: Option<String>,
    pub search_mode: SearchMode,
    pub top_n: usize,
}

impl DashboardConfig {
    pub const DEFAULT_TOP_N: usize = 10;

    pub fn new(selected_party: PartyId) -> DashboardConfig {
        DashboardConfig {
            year_range: YearRange::ALL,
            show_all_years: false,
            compare_mode: false,
            selected_parties: vec![selected_party.clone()],
            selected_party,
            selected_domain: None,
            selected_category: None,
            stop_words: Vec::new(),
            search_word: None,
            search_mode: SearchMode::Substring,
            top_n: DashboardConfig::DEFAULT_TOP_N,
        }
    }

    pub fn with_year_range(self, year_range: YearRange) -> DashboardConfig {
        DashboardConfig { year_range, ..self }
    }

    pub fn comparing(self, parties: &[PartyId]) -> DashboardConfig {
        DashboardConfig {
            compare_mode: true,
            selected_parties: parties.to_vec(),
            ..self
        }
    }

    pub fn with_category(self, category: &str) -> DashboardConfig {
        DashboardConfig {
            selected_category: Some(category.to_string()),
            ..self
        }
    }

    pub fn with_domain(self, domain: &str) -> DashboardConfig {
        DashboardConfig {
            selected_domain: Some(domain.to_string()),
            ..self
        }
    }

    pub fn with_search(self, word: &str, mode: SearchMode) -> DashboardConfig {
        DashboardConfig {
            search_word: Some(word.to_string()),
            search_mode: mode,
            ..self
        }
    }

    /// The year interval actually applied by the filter.
    pub fn effective_year_range(&self) -> YearRange {
        if self.show_all_years {
            YearRange::ALL
        } else {
            self.year_range
        }
    }

    /// The parties to process, in display order.
    pub fn parties(&self) -> Vec<PartyId> {
        if self.compare_mode {
            let mut seen: HashSet<&PartyId> = HashSet::new();
            self.selected_parties
                .iter()
                .filter(|p| seen.insert(*p))
                .cloned()
                .collect()
        } else {
            vec![self.selected_party.clone()]
        }
    }
}

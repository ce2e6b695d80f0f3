//! Named entities.
//!
//! The `ner` field of a record is a list of `(text, label)` pairs written with the
//! Python literal syntax, for example `[('Modi', 'PERSON'), ("India's", 'GPE')]`.
//! It is read with a restricted literal parser: only lists of string pairs are
//! understood, and an entry that does not parse is skipped without affecting the
//! other entries of the row.

use log::{debug, warn};
use nom::{
    branch::alt,
    bytes::complete::{take_while1, take_while_m_n},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, map_opt, opt, value},
    multi::fold_many0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use std::collections::HashSet;

pub use crate::config::*;
use crate::tokens::Tally;

/// Generic English stop words.
const GENERIC_STOP_WORDS: &[&str] = &[
    "a", "about", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been", "but",
    "by", "can", "for", "from", "has", "have", "he", "her", "his", "i", "in", "into", "is",
    "it", "its", "may", "more", "no", "not", "of", "on", "one", "or", "our", "over", "shall",
    "she", "so", "such", "than", "that", "the", "their", "them", "there", "these", "they",
    "this", "those", "through", "to", "under", "up", "upon", "us", "was", "we", "were", "which",
    "who", "will", "with", "would", "you",
];

/// Party names and their fragments. They appear in nearly every manifesto of their
/// own party and would dominate the rankings.
const PARTY_STOP_WORDS: &[&str] = &[
    "BJP",
    "Bharatiya Janata Party",
    "Bharatiya Janata",
    "Janata",
    "INC",
    "Congress",
    "Indian National Congress",
    "National Congress",
    "Party",
];

/// Words excluded from the entity and word rankings.
///
/// Entities are compared exactly (case-sensitive). Words of the word cloud are compared
/// without case.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct StopList {
    words: HashSet<String>,
    lowered: HashSet<String>,
}

impl StopList {
    pub fn new(words: &[&str]) -> StopList {
        let mut res = StopList::default();
        for w in words.iter() {
            res.insert(w);
        }
        res
    }

    /// The generic stop words together with the party names.
    pub fn default_list() -> StopList {
        let mut res = StopList::new(GENERIC_STOP_WORDS);
        for w in PARTY_STOP_WORDS.iter() {
            res.insert(w);
        }
        res
    }

    /// Adds some custom stop words.
    pub fn with_words(mut self, words: &[String]) -> StopList {
        for w in words.iter() {
            self.insert(w);
        }
        self
    }

    fn insert(&mut self, word: &str) {
        self.words.insert(word.to_string());
        self.lowered.insert(word.to_lowercase());
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn contains_ignore_case(&self, word: &str) -> bool {
        self.lowered.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// A named entity, as annotated.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

/// The entities of one `ner` field.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ParsedEntities {
    pub entities: Vec<Entity>,
    /// Number of entries that could not be understood.
    pub skipped: usize,
}

/// Reads a `ner` field.
///
/// An empty field has no entities. A field that is not a list literal at all is an
/// error. Inside the list, malformed entries are counted in `skipped` and dropped.
/// Nothing in the field is ever evaluated.
pub fn parse_entities(field: &str) -> Result<ParsedEntities, String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(ParsedEntities::default());
    }
    let body = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("not a list literal: {:.40}", trimmed))?;

    let mut res = ParsedEntities::default();
    for element in split_top_level(body) {
        match all_consuming(delimited(multispace0, entity_pair, multispace0))(element) {
            Ok((_, (text, label))) => res.entities.push(Entity { text, label }),
            Err(e) => {
                debug!("parse_entities: skipping entry {:?}: {:?}", element, e);
                res.skipped += 1;
            }
        }
    }
    Ok(res)
}

/// The `top_n` most frequent entity texts, by decreasing count.
///
/// The entity labels are not used. Entities listed in the stop list are dropped.
/// Counting and tie-breaks follow [crate::tokens::rank_tokens].
pub fn rank_entities(rows: &[&ManifestoRecord], stop_list: &StopList, top_n: usize) -> Ranking {
    let mut tally = Tally::default();
    let mut skipped_entries: usize = 0;
    for (idx, row) in rows.iter().enumerate() {
        match parse_entities(&row.ner) {
            Ok(parsed) => {
                skipped_entries += parsed.skipped;
                for entity in parsed.entities.iter() {
                    if !stop_list.contains(&entity.text) {
                        tally.add(&entity.text);
                    }
                }
            }
            Err(msg) => {
                warn!(
                    "rank_entities: row {} (year {}): ignoring entity annotations: {}",
                    idx, row.year, msg
                );
            }
        }
    }
    if skipped_entries > 0 {
        warn!(
            "rank_entities: skipped {} malformed entity entries",
            skipped_entries
        );
    }
    tally.into_ranking(top_n)
}

// Splits the body of a list on the commas that are outside of quotes and brackets.
// An unterminated quote swallows the rest of the body into the last element.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut res: Vec<&str> = Vec::new();
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start: usize = 0;
    for (idx, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth <= 0 => {
                res.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    res.push(&body[start..]);
    res.into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect()
}

enum Fragment<'a> {
    Literal(&'a str),
    Escaped(char),
}

fn code_point(input: &str) -> IResult<&str, char> {
    map_opt(
        alt((
            preceded(char('x'), take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit())),
            preceded(char('u'), take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit())),
            preceded(char('U'), take_while_m_n(8, 8, |c: char| c.is_ascii_hexdigit())),
        )),
        |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
    )(input)
}

fn escaped_char(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            value('\n', char('n')),
            value('\t', char('t')),
            value('\r', char('r')),
            value('\\', char('\\')),
            value('\'', char('\'')),
            value('"', char('"')),
            code_point,
        )),
    )(input)
}

fn quoted<'a>(quote: char) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    move |input: &'a str| {
        let fragment = alt((
            map(
                take_while1(|c: char| c != quote && c != '\\'),
                Fragment::Literal,
            ),
            map(escaped_char, Fragment::Escaped),
        ));
        let body = fold_many0(fragment, String::new, |mut acc: String, f| {
            match f {
                Fragment::Literal(s) => acc.push_str(s),
                Fragment::Escaped(c) => acc.push(c),
            }
            acc
        });
        delimited(char(quote), body, char(quote))(input)
    }
}

fn python_string(input: &str) -> IResult<&str, String> {
    alt((quoted('\''), quoted('"')))(input)
}

fn pair_body(input: &str) -> IResult<&str, (String, String)> {
    terminated(
        separated_pair(
            python_string,
            tuple((multispace0, char(','), multispace0)),
            python_string,
        ),
        opt(pair(multispace0, char(','))),
    )(input)
}

// A tuple or a list of exactly two strings.
fn entity_pair(input: &str) -> IResult<&str, (String, String)> {
    alt((
        delimited(
            pair(char('('), multispace0),
            pair_body,
            pair(multispace0, char(')')),
        ),
        delimited(
            pair(char('['), multispace0),
            pair_body,
            pair(multispace0, char(']')),
        ),
    ))(input)
}

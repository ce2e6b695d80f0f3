use log::{debug, info, warn};
use std::collections::BTreeSet;

pub use crate::config::*;

/// A builder for assembling the corpus store.
///
/// This is the only way to create a [CorpusStore]: it checks that all the party
/// tables share the same category columns.
///
/// ```
/// use manifesto_analytics::builder::CorpusBuilder;
/// use manifesto_analytics::{PartyId, TaxonomyEntry};
/// # use manifesto_analytics::AnalyticsError;
///
/// let store = CorpusBuilder::new()
///     .taxonomy(&[TaxonomyEntry::new("Agriculture", "Economy")])?
///     .party(&PartyId::new("BJP"), Vec::new())?
///     .build()?;
///
/// assert_eq!(store.parties().len(), 1);
/// # Ok::<(), AnalyticsError>(())
/// ```
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    pub(crate) _taxonomy: Taxonomy,
    pub(crate) _parties: Vec<PartyCorpus>,
}

impl CorpusBuilder {
    pub fn new() -> CorpusBuilder {
        CorpusBuilder::default()
    }

    pub fn taxonomy(self, entries: &[TaxonomyEntry]) -> AnalyticsResult<CorpusBuilder> {
        Ok(CorpusBuilder {
            _taxonomy: Taxonomy::from_entries(entries)?,
            _parties: self._parties,
        })
    }

    /// Adds the table of one party. The records keep their order.
    pub fn party(
        mut self,
        party: &PartyId,
        records: Vec<ManifestoRecord>,
    ) -> AnalyticsResult<CorpusBuilder> {
        if self._parties.iter().any(|pc| pc.party == *party) {
            return Err(AnalyticsError::DuplicateParty(party.0.clone()));
        }
        debug!("party: {} with {} records", party, records.len());
        self._parties.push(PartyCorpus {
            party: party.clone(),
            records,
        });
        Ok(self)
    }

    pub fn build(self) -> AnalyticsResult<CorpusStore> {
        // The reference enumeration is taken from the first record of the first non-empty table.
        let reference: BTreeSet<String> = self
            ._parties
            .iter()
            .flat_map(|pc| pc.records.first())
            .map(|r| r.scores.keys().cloned().collect::<BTreeSet<String>>())
            .next()
            .unwrap_or_default();

        for pc in self._parties.iter() {
            for record in pc.records.iter() {
                let keys: BTreeSet<String> = record.scores.keys().cloned().collect();
                if keys != reference {
                    return Err(AnalyticsError::MismatchedCategories {
                        party: pc.party.0.clone(),
                        missing: reference.difference(&keys).cloned().collect(),
                        extra: keys.difference(&reference).cloned().collect(),
                    });
                }
                if !MANIFESTO_YEARS.contains(&record.year) {
                    warn!(
                        "build: party {}: record with year {} outside of {:?}",
                        pc.party, record.year, MANIFESTO_YEARS
                    );
                }
            }
        }

        // Reported again as a hard error by the roll-ups that need these categories.
        let orphans: Vec<&String> = reference
            .iter()
            .filter(|c| self._taxonomy.domain_of(c).is_none())
            .collect();
        if !orphans.is_empty() {
            warn!(
                "build: {} category columns have no taxonomy entry: {:?}",
                orphans.len(),
                orphans
            );
        }

        let categories: Vec<String> = reference.into_iter().collect();
        info!(
            "build: {} parties, {} categories, {} taxonomy entries",
            self._parties.len(),
            categories.len(),
            self._taxonomy.len()
        );
        Ok(CorpusStore {
            parties: self._parties,
            taxonomy: self._taxonomy,
            categories,
        })
    }
}

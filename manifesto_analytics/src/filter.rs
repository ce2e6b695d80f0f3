use log::debug;

pub use crate::config::*;

/// The rows of a party table that fall within the inclusive year range.
///
/// The rows are borrowed from the corpus and keep their table order.
/// A range with `lo > hi` matches nothing.
pub fn filter_years(corpus: &PartyCorpus, range: YearRange) -> Vec<&ManifestoRecord> {
    let res: Vec<&ManifestoRecord> = corpus
        .records
        .iter()
        .filter(|r| range.contains(r.year))
        .collect();
    debug!(
        "filter_years: party {} range {:?}: {} of {} rows",
        corpus.party,
        range,
        res.len(),
        corpus.records.len()
    );
    res
}

/// Filters every requested party independently, with the same year range.
///
/// Arguments:
/// * `parties` the parties to keep, in output order. All the parties of the store are
/// returned (in store order) if not provided.
pub fn filter_parties<'a>(
    store: &'a CorpusStore,
    range: YearRange,
    parties: Option<&[PartyId]>,
) -> AnalyticsResult<Vec<(PartyId, Vec<&'a ManifestoRecord>)>> {
    let selected: Vec<&PartyCorpus> = match parties {
        Some(ids) => ids
            .iter()
            .map(|p| store.party(p))
            .collect::<AnalyticsResult<Vec<&PartyCorpus>>>()?,
        None => store.parties().iter().collect(),
    };
    Ok(selected
        .into_iter()
        .map(|pc| (pc.party.clone(), filter_years(pc, range)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CorpusBuilder;
    use std::collections::BTreeMap;

    fn record(year: u16, text: &str) -> ManifestoRecord {
        ManifestoRecord {
            year,
            domains: String::new(),
            topic_subcategories: String::new(),
            summary_topics: String::new(),
            ner: "[]".to_string(),
            text: text.to_string(),
            scores: BTreeMap::new(),
        }
    }

    fn corpus() -> PartyCorpus {
        PartyCorpus {
            party: PartyId::new("BJP"),
            records: vec![
                record(2004, "a"),
                record(2009, "b"),
                record(2014, "c"),
                record(2019, "d"),
                record(2024, "e"),
                record(2009, "f"),
            ],
        }
    }

    fn texts(rows: &[&ManifestoRecord]) -> Vec<String> {
        rows.iter().map(|r| r.text.clone()).collect()
    }

    #[test]
    fn inclusive_bounds() {
        let c = corpus();
        let rows = filter_years(&c, YearRange::new(2009, 2019));
        assert_eq!(texts(&rows), vec!["b", "c", "d", "f"]);
    }

    #[test]
    fn single_year() {
        let c = corpus();
        let rows = filter_years(&c, YearRange::new(2009, 2009));
        assert_eq!(texts(&rows), vec!["b", "f"]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let c = corpus();
        assert!(filter_years(&c, YearRange::new(2019, 2009)).is_empty());
    }

    #[test]
    fn full_range_returns_the_corpus() {
        let c = corpus();
        let rows = filter_years(&c, YearRange::ALL);
        let mut got = texts(&rows);
        got.sort();
        let mut expected: Vec<String> = c.records.iter().map(|r| r.text.clone()).collect();
        expected.sort();
        assert_eq!(got, expected);
        assert_eq!(c, corpus());
    }

    #[test]
    fn parties_are_filtered_independently() {
        let store = CorpusBuilder::new()
            .party(&PartyId::new("BJP"), vec![record(2004, "b1"), record(2014, "b2")])
            .unwrap()
            .party(&PartyId::new("INC"), vec![record(2014, "i1"), record(2024, "i2")])
            .unwrap()
            .build()
            .unwrap();
        let res = filter_parties(
            &store,
            YearRange::new(2014, 2024),
            Some(&[PartyId::new("INC"), PartyId::new("BJP")][..]),
        )
        .unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].0, PartyId::new("INC"));
        assert_eq!(texts(&res[0].1), vec!["i1", "i2"]);
        assert_eq!(res[1].0, PartyId::new("BJP"));
        assert_eq!(texts(&res[1].1), vec!["b2"]);

        let all = filter_parties(&store, YearRange::ALL, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, PartyId::new("BJP"));
    }

    #[test]
    fn unknown_party() {
        let store = CorpusBuilder::new().build().unwrap();
        let res = filter_parties(&store, YearRange::ALL, Some(&[PartyId::new("AAP")][..]));
        assert_eq!(
            res.err(),
            Some(AnalyticsError::UnknownParty("AAP".to_string()))
        );
    }
}

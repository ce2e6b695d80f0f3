/*!
Analytics over a corpus of party manifestos.

Each party contributes a table of manifesto paragraphs (one row per paragraph) with
a year, some comma-separated topic fields, a list of named entities, the raw text and
one numeric score per policy category. A taxonomy attaches every category
(subcategory) to a broader policy domain.

The crate computes the panels of a comparison dashboard:
* the most frequent domains, subcategories, summary topics, entities and words
* the totals per domain, and per subcategory inside a domain
* the yearly trend of a category, per party
* the frequency of a search term

```
use manifesto_analytics::builder::CorpusBuilder;
use manifesto_analytics::dashboard::run_dashboard;
use manifesto_analytics::*;
use std::collections::BTreeMap;

let mut scores = BTreeMap::new();
scores.insert("Agriculture".to_string(), 2.0);
let record = ManifestoRecord {
    year: 2019,
    domains: "Economy".to_string(),
    topic_subcategories: "Agriculture".to_string(),
    summary_topics: "farmers".to_string(),
    ner: "[('Kisan', 'ORG')]".to_string(),
    text: "Support for farmers".to_string(),
    scores,
};
let store = CorpusBuilder::new()
    .taxonomy(&[TaxonomyEntry::new("Agriculture", "Economy")])?
    .party(&PartyId::new("BJP"), vec![record])?
    .build()?;
let config = DashboardConfig::new(PartyId::new("BJP")).with_category("Agriculture");
let report = run_dashboard(&store, &config)?;
assert_eq!(report.parties[0].trend, Some(Ok(vec![(2019, 2.0)])));
# Ok::<(), AnalyticsError>(())
```

See the [manual] for the layout of the input tables.
*/

mod config;

pub mod builder;
pub mod dashboard;
pub mod entities;
pub mod filter;
pub mod manual;
pub mod search;
pub mod taxonomy;
pub mod tokens;
pub mod trend;

pub use crate::config::*;

use crate::mdash::*;
use snafu::prelude::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::path::PathBuf;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName", default)]
    pub dashboard_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

impl OutputSettings {
    /// The dashboard name, usable in a file name.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .dashboard_name
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        if stem.is_empty() {
            "dashboard".to_string()
        } else {
            stem
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSource {
    pub party: String,
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomySource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "domainColumn")]
    pub domain_column: Option<String>,
    #[serde(rename = "subcategoryColumn")]
    pub subcategory_column: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl TaxonomySource {
    pub fn domain_column(&self) -> &str {
        self.domain_column.as_deref().unwrap_or("Domain")
    }

    pub fn subcategory_column(&self) -> &str {
        self.subcategory_column.as_deref().unwrap_or("Subcategory")
    }
}

/// The initial state of the dashboard controls. Everything is optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(rename = "fromYear")]
    pub from_year: Option<u16>,
    #[serde(rename = "toYear")]
    pub to_year: Option<u16>,
    #[serde(rename = "allYears")]
    pub all_years: Option<bool>,
    #[serde(rename = "selectedParty")]
    pub selected_party: Option<String>,
    #[serde(rename = "compareParties")]
    pub compare_parties: Option<Vec<String>>,
    #[serde(rename = "selectedCategory")]
    pub selected_category: Option<String>,
    #[serde(rename = "selectedDomain")]
    pub selected_domain: Option<String>,
    #[serde(rename = "searchWord")]
    pub search_word: Option<String>,
    #[serde(rename = "wholeWord")]
    pub whole_word: Option<bool>,
    #[serde(rename = "stopWords")]
    pub stop_words: Option<Vec<String>>,
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
}

impl FilterSettings {
    /// The configuration of the pipeline. Without a selected party, the first party
    /// of the corpus is displayed.
    pub fn dashboard_config(&self, store: &CorpusStore) -> MdashResult<DashboardConfig> {
        let selected_party = match self.selected_party.as_ref() {
            Some(p) => PartyId::new(p),
            None => store
                .party_ids()
                .first()
                .cloned()
                .context(NoCorpusSnafu {})?,
        };
        let mut res = DashboardConfig::new(selected_party).with_year_range(YearRange::new(
            self.from_year.unwrap_or(YearRange::ALL.lo),
            self.to_year.unwrap_or(YearRange::ALL.hi),
        ));
        if let Some(parties) = self.compare_parties.as_ref() {
            if !parties.is_empty() {
                let ids: Vec<PartyId> = parties.iter().map(|p| PartyId::new(p)).collect();
                res = res.comparing(&ids);
            }
        }
        if let Some(category) = self.selected_category.as_ref() {
            res = res.with_category(category);
        }
        if let Some(domain) = self.selected_domain.as_ref() {
            res = res.with_domain(domain);
        }
        if let Some(word) = self.search_word.as_ref() {
            let mode = if self.whole_word.unwrap_or(false) {
                SearchMode::WholeWord
            } else {
                SearchMode::Substring
            };
            res = res.with_search(word, mode);
        }
        res.show_all_years = self.all_years.unwrap_or(false);
        res.stop_words = self.stop_words.clone().unwrap_or_default();
        res.top_n = self.top_n.unwrap_or(DashboardConfig::DEFAULT_TOP_N);
        debug!("dashboard_config: {:?}", res);
        Ok(res)
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MdashConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "corpusSources", default)]
    pub corpus_sources: Vec<CorpusSource>,
    #[serde(rename = "taxonomySource")]
    pub taxonomy_source: Option<TaxonomySource>,
    #[serde(default)]
    pub filters: FilterSettings,
}

/// Reads a configuration file. The relative paths it contains are resolved against the
/// directory of the file.
pub fn read_config(path: &str) -> MdashResult<MdashConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config: MdashConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let root = Path::new(path).parent().context(MissingParentDirSnafu {})?;
    let resolve = |p: &str| -> String {
        let full: PathBuf = root.join(p);
        full.display().to_string()
    };
    for cs in config.corpus_sources.iter_mut() {
        cs.file_path = resolve(&cs.file_path);
    }
    if let Some(ts) = config.taxonomy_source.as_mut() {
        ts.file_path = resolve(&ts.file_path);
    }
    if let Some(dir) = config.output_settings.output_directory.clone() {
        config.output_settings.output_directory = Some(resolve(&dir));
    }
    info!("config: {:?}", config);
    Ok(config)
}

/// Reads a summary previously written by this program.
pub fn read_summary(path: &str) -> MdashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

use clap::Parser;

/// This is a comparison dashboard over party manifestos.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the corpus and the filters.
    /// See the manual of manifesto_analytics for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (PARTY=PATH, repeatable) A party table, in CSV or Excel format (decided by the extension).
    /// Adds to the sources listed in the config file.
    #[clap(long, value_parser)]
    pub corpus: Vec<String>,

    /// (file path) The taxonomy table. Overrides the one in the config file.
    #[clap(short, long, value_parser)]
    pub taxonomy: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the dashboard will be written in JSON
    /// format to the given location. Setting this option overrides the output directory of the config file.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, mdash will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// The party to display. Defaults to the first party of the corpus.
    #[clap(short, long, value_parser)]
    pub party: Option<String>,

    /// (repeatable) Switches to the comparison mode with the given parties.
    #[clap(long, value_parser)]
    pub compare: Vec<String>,

    #[clap(long, value_parser)]
    pub from_year: Option<u16>,

    #[clap(long, value_parser)]
    pub to_year: Option<u16>,

    /// Ignores the year range and uses all the years.
    #[clap(long, takes_value = false)]
    pub all_years: bool,

    /// The category (score column) for the trend panel.
    #[clap(long, value_parser)]
    pub category: Option<String>,

    /// The domain for the breakdown panel.
    #[clap(long, value_parser)]
    pub domain: Option<String>,

    /// A word to look for in the raw text.
    #[clap(short, long, value_parser)]
    pub search: Option<String>,

    /// Only matches the search term as a whole word.
    #[clap(long, takes_value = false)]
    pub whole_word: bool,

    /// (repeatable) Additional stop words for the entity and word rankings.
    #[clap(long, value_parser)]
    pub stop_word: Vec<String>,

    /// (default 10) The number of entries in each ranking.
    #[clap(long, value_parser)]
    pub top_n: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

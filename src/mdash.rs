use log::{debug, info, warn};

use manifesto_analytics::builder::CorpusBuilder;
use manifesto_analytics::dashboard::{run_dashboard, DashboardReport};
use manifesto_analytics::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::mdash::config_reader::*;
use crate::mdash::io_common::{provider_from_path, simplify_file_name, RawTable};
use crate::mdash::render::{JsonRenderer, ReportRenderer, TextRenderer};

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
pub mod render;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MdashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet {name:?} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("{path} contains several worksheets, one must be chosen with excelWorksheetName"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Empty table in {path}"))]
    EmptyTable { path: String },
    #[snafu(display("Line {lineno}: cannot read cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading {path} at line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Missing column {column:?} in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("{path}, line {lineno}: invalid year {content:?}"))]
    ParsingYear {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("{path}, line {lineno}: invalid score {content:?} in column {column:?}"))]
    ParsingScore {
        path: String,
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Unknown provider {provider:?} (expected csv or xlsx)"))]
    UnknownProvider { provider: String },
    #[snafu(display("Cannot read corpus argument {arg:?}: expected PARTY=PATH"))]
    InvalidCorpusArg { arg: String },
    #[snafu(display("No party table provided"))]
    NoCorpus {},
    #[snafu(display("No taxonomy table provided"))]
    NoTaxonomy {},
    #[snafu(display("{source}"))]
    Analytics { source: AnalyticsError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MdashResult<T> = Result<T, MdashError>;

const STDOUT: &str = "stdout";

fn read_table(provider: &str, path: &str, worksheet: Option<&str>) -> MdashResult<RawTable> {
    info!("Attempting to read {} file {:?}", provider, path);
    match provider {
        "csv" => io_csv::read_csv_table(path),
        "xlsx" | "excel" => io_excel::read_excel_table(path, worksheet),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

fn read_party_table(source: &CorpusSource) -> MdashResult<Vec<ManifestoRecord>> {
    let table = read_table(
        &source.provider,
        &source.file_path,
        source.excel_worksheet_name.as_deref(),
    )?;
    let records = io_common::table_to_records(&table)?;
    info!(
        "read_party_table: {}: {} rows from {}",
        source.party,
        records.len(),
        simplify_file_name(&source.file_path)
    );
    Ok(records)
}

fn read_taxonomy_table(source: &TaxonomySource) -> MdashResult<Vec<TaxonomyEntry>> {
    let table = read_table(
        &source.provider,
        &source.file_path,
        source.excel_worksheet_name.as_deref(),
    )?;
    io_common::table_to_taxonomy(&table, source.domain_column(), source.subcategory_column())
}

/// Reads all the tables and assembles the corpus.
pub fn load_corpus(config: &MdashConfig) -> MdashResult<CorpusStore> {
    ensure!(!config.corpus_sources.is_empty(), NoCorpusSnafu {});
    let taxonomy_source = config.taxonomy_source.as_ref().context(NoTaxonomySnafu {})?;
    let entries = read_taxonomy_table(taxonomy_source)?;
    let mut builder = CorpusBuilder::new()
        .taxonomy(&entries)
        .context(AnalyticsSnafu {})?;
    for source in config.corpus_sources.iter() {
        let records = read_party_table(source)?;
        builder = builder
            .party(&PartyId::new(&source.party), records)
            .context(AnalyticsSnafu {})?;
    }
    builder.build().context(AnalyticsSnafu {})
}

/// Applies the command line on top of the configuration file (if any).
pub fn merge_args(config: MdashConfig, args: &Args) -> MdashResult<MdashConfig> {
    let mut res = config;

    for arg in args.corpus.iter() {
        let (party, path) = match arg.split_once('=') {
            Some((p, f)) if !p.trim().is_empty() && !f.trim().is_empty() => (p.trim(), f.trim()),
            _ => return InvalidCorpusArgSnafu { arg: arg.clone() }.fail(),
        };
        let source = CorpusSource {
            party: party.to_string(),
            provider: provider_from_path(path).to_string(),
            file_path: path.to_string(),
            excel_worksheet_name: None,
        };
        // The command line replaces the table of a party listed in the file.
        match res.corpus_sources.iter_mut().find(|cs| cs.party == party) {
            Some(cs) => *cs = source,
            None => res.corpus_sources.push(source),
        }
    }

    if let Some(path) = args.taxonomy.as_ref() {
        res.taxonomy_source = Some(TaxonomySource {
            provider: provider_from_path(path).to_string(),
            file_path: path.clone(),
            domain_column: None,
            subcategory_column: None,
            excel_worksheet_name: None,
        });
    }

    let filters = &mut res.filters;
    if args.party.is_some() {
        filters.selected_party = args.party.clone();
    }
    if !args.compare.is_empty() {
        filters.compare_parties = Some(args.compare.clone());
    }
    if args.from_year.is_some() {
        filters.from_year = args.from_year;
    }
    if args.to_year.is_some() {
        filters.to_year = args.to_year;
    }
    if args.all_years {
        filters.all_years = Some(true);
    }
    if args.category.is_some() {
        filters.selected_category = args.category.clone();
    }
    if args.domain.is_some() {
        filters.selected_domain = args.domain.clone();
    }
    if args.search.is_some() {
        filters.search_word = args.search.clone();
    }
    if args.whole_word {
        filters.whole_word = Some(true);
    }
    if !args.stop_word.is_empty() {
        let mut words = filters.stop_words.clone().unwrap_or_default();
        words.extend(args.stop_word.iter().cloned());
        filters.stop_words = Some(words);
    }
    if args.top_n.is_some() {
        filters.top_n = args.top_n;
    }
    debug!("merge_args: {:?}", res);
    Ok(res)
}

/// Where the summary goes: the --out flag first, then the output directory of the
/// configuration file.
fn output_target(config: &MdashConfig, out: &Option<String>) -> Option<String> {
    match out {
        Some(o) if o.is_empty() => None,
        Some(o) => Some(o.clone()),
        None => config.output_settings.output_directory.as_ref().map(|dir| {
            Path::new(dir)
                .join(format!("{}_summary.json", config.output_settings.file_stem()))
                .display()
                .to_string()
        }),
    }
}

fn write_summary(target: &str, pretty_js: &str) -> MdashResult<()> {
    if target == STDOUT {
        println!("{}", pretty_js);
        return Ok(());
    }
    if let Some(parent) = Path::new(target).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu { path: target })?;
        }
    }
    fs::write(target, pretty_js).context(WritingOutputSnafu { path: target })?;
    info!("Summary written to {}", target);
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js: &str) -> MdashResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("The summary matches the reference {}", reference_path);
    Ok(())
}

/// Runs the dashboard once and returns the JSON summary.
pub fn run_mdash(
    config: &MdashConfig,
    out: &Option<String>,
    reference: &Option<String>,
) -> MdashResult<JSValue> {
    let store = load_corpus(config)?;
    let dashboard_config = config.filters.dashboard_config(&store)?;
    let report: DashboardReport =
        run_dashboard(&store, &dashboard_config).context(AnalyticsSnafu {})?;

    for line in TextRenderer.render(&report) {
        info!("{}", line);
    }

    let renderer = JsonRenderer {
        dashboard_name: config.output_settings.dashboard_name.clone(),
    };
    let result_js = renderer.render(&report);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    if let Some(target) = output_target(config, out) {
        write_summary(&target, &pretty_js)?;
    }
    if let Some(reference_path) = reference {
        check_reference(reference_path, &pretty_js)?;
    }
    Ok(result_js)
}

/// The entry point of the command line.
pub fn run_from_args(args: &Args) -> MdashResult<JSValue> {
    let config = match args.config.as_ref() {
        Some(path) => read_config(path)?,
        None => MdashConfig::default(),
    };
    let config = merge_args(config, args)?;
    run_mdash(&config, &args.out, &args.reference)
}

fn run_dashboard_test(
    test_name: &str,
    config_lpath: &str,
    summary_lpath: &str,
) -> MdashResult<JSValue> {
    let test_dir = option_env!("MDASH_TEST_DIR").unwrap_or(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/testdata"
    ));
    info!("Running test {}", test_name);
    let config = read_config(&format!("{}/{}/{}", test_dir, test_name, config_lpath))?;
    run_mdash(
        &config,
        &None,
        &Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
    )
}

pub fn test_wrapper(test_name: &str) -> MdashResult<JSValue> {
    let res = run_dashboard_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn test_dir() -> String {
        option_env!("MDASH_TEST_DIR")
            .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata"))
            .to_string()
    }

    #[test]
    fn basic() {
        test_wrapper("basic").unwrap();
    }

    #[test]
    fn excel_party() {
        test_wrapper("excel_party").unwrap();
    }

    #[test]
    fn command_line_only() {
        let dir = format!("{}/basic", test_dir());
        let args = Args::parse_from([
            "mdash".to_string(),
            "--corpus".to_string(),
            format!("INC={}/inc.csv", dir),
            "--taxonomy".to_string(),
            format!("{}/taxonomy.csv", dir),
            "--category".to_string(),
            "Industry".to_string(),
            "--from-year".to_string(),
            "2019".to_string(),
        ]);
        let js = run_from_args(&args).unwrap();
        let inc = &js["results"][0];
        assert_eq!(inc["party"], "INC");
        assert_eq!(inc["rows"], 2);
        assert_eq!(
            inc["trend"],
            serde_json::json!([{"year": 2019, "value": 0.0}, {"year": 2024, "value": 5.0}])
        );
    }

    #[test]
    fn command_line_overrides_config() {
        let args = Args::parse_from([
            "mdash".to_string(),
            "--config".to_string(),
            format!("{}/basic/basic_config.json", test_dir()),
            "--party".to_string(),
            "INC".to_string(),
            "--compare".to_string(),
            "INC".to_string(),
            "--category".to_string(),
            "Cricket".to_string(),
            "--top-n".to_string(),
            "1".to_string(),
        ]);
        let js = run_from_args(&args).unwrap();
        let results = js["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["party"], "INC");
        assert_eq!(
            results[0]["topDomains"],
            serde_json::json!([{"name": "Society", "count": 2}])
        );
        // The other panels are still there.
        assert_eq!(
            results[0]["trend"]["error"],
            "unknown category \"Cricket\""
        );
        assert_eq!(results[0]["search"]["matchingRows"], 1);
    }

    #[test]
    fn bad_corpus_argument() {
        let args = Args::parse_from(["mdash", "--corpus", "bjp.csv"]);
        let res = merge_args(MdashConfig::default(), &args);
        assert!(matches!(res, Err(MdashError::InvalidCorpusArg { .. })));
    }

    #[test]
    fn missing_inputs() {
        let res = run_mdash(&MdashConfig::default(), &None, &None);
        assert!(matches!(res, Err(MdashError::NoCorpus {})));
    }

    #[test]
    fn reference_mismatch() {
        let dir = test_dir();
        let config = read_config(&format!("{}/basic/basic_config.json", dir)).unwrap();
        let config = MdashConfig {
            filters: FilterSettings {
                top_n: Some(1),
                ..config.filters.clone()
            },
            ..config
        };
        let res = run_mdash(
            &config,
            &None,
            &Some(format!("{}/basic/basic_expected_summary.json", dir)),
        );
        assert!(matches!(res, Err(MdashError::Whatever { .. })));
    }
}

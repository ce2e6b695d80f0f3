/*!

This is the long-form manual for `manifesto_analytics` and `mdash`.

## Party tables

Each party has one table, in CSV or Excel (.xlsx) format. The first row contains
the names of the columns. The following columns have a fixed meaning:

| column                | content                                                        |
|-----------------------|----------------------------------------------------------------|
| `Year`                | the year of the manifesto: 2004, 2009, 2014, 2019 or 2024      |
| `Domains`             | comma-separated list of the domains of the paragraph           |
| `Topic_Subcategories` | comma-separated list of subcategories                          |
| `Summary_Topics`      | comma-separated list of short topics                           |
| `NER`                 | the named entities, as a list of `(text, label)` pairs         |
| `Text`                | the raw text of the paragraph                                  |

Every other column is a score column: its name is a category and its cells contain
numbers. An empty score cell counts as 0. Columns with an empty name or a name starting
with `Unnamed` (left over by some spreadsheet exports) are ignored.

All the rows of all the parties must carry the same score columns.

A year written as a decimal number (`2004.0`) is accepted.

### The `NER` column

The entities are written as a list literal of pairs:

```text
[('Narendra Modi', 'PERSON'), ("Kisan Samman", 'ORG'), ('Assam', 'GPE')]
```

Strings may use single or double quotes and the usual backslash escapes. Pairs can
also be written with brackets. The field is only parsed, never evaluated. A pair that
cannot be read is skipped, and a field that is not a list at all is skipped entirely
with a warning.

## Taxonomy table

The taxonomy has one row per subcategory, with the subcategory and the domain
owning it. The names of the two columns default to `Subcategory` and `Domain`.
A subcategory must not be listed under two different domains.

Every category appearing in the party tables must be in the taxonomy for the domain
totals to be computed. Categories missing from the taxonomy are reported when the
corpus is loaded.

## Configuration

The `mdash` program reads its inputs from a JSON file:

```json
{
  "outputSettings": {
    "dashboardName": "Manifestos 2004-2024",
    "outputDirectory": "output"
  },
  "corpusSources": [
    { "party": "BJP", "provider": "csv", "filePath": "bjp.csv" },
    { "party": "INC", "provider": "xlsx", "filePath": "inc.xlsx", "excelWorksheetName": "Sheet1" }
  ],
  "taxonomySource": {
    "provider": "csv",
    "filePath": "taxonomy.csv"
  },
  "filters": {
    "fromYear": 2009,
    "toYear": 2019,
    "selectedParty": "BJP",
    "compareParties": ["BJP", "INC"],
    "selectedCategory": "Agriculture",
    "selectedDomain": "Economy",
    "searchWord": "water",
    "wholeWord": true,
    "stopWords": ["india"],
    "topN": 10
  }
}
```

The paths are relative to the directory of the configuration file. All the filters
are optional and can be overridden from the command line.

## Output

The summary is a JSON document with one entry per party. A panel that could not be
computed is replaced by its error message; the other panels are still reported.
*/

/*!

This is the long-form manual for `survey_analytics` and `surveytally`.

## Question types

| Type       | Widget                | Raw answer                          | Rendering        |
|------------|-----------------------|-------------------------------------|------------------|
| `TEXT`     | short text            | the text                            | answers verbatim |
| `TEXTAREA` | long text             | the text                            | answers verbatim |
| `RADIO`    | single choice         | the selected label                  | frequency table  |
| `SELECT`   | drop-down list        | the selected label                  | frequency table  |
| `CHECKBOX` | multiple choice       | a JSON array of the selected labels | frequency table  |

The options of a question are stored by the server as a JSON-encoded array in a string
field, for example `"[\"Red\",\"Blue\"]"`. The answer to a `CHECKBOX` question is
encoded the same way: a string field whose content is a JSON array literal.

## Frequency tables

A frequency table has one row per distinct label, with the number of respondents who
picked it and the percentage of the respondents of the question (`totalAnswers`).
Rows are sorted by decreasing count. Rows with the same count keep the order in which
their labels first appear in the answers.

A few rules to keep in mind:
- a `CHECKBOX` answer counts once for each selected label. The percentages of a
  multiple choice question can add up to more than 100%.
- a `CHECKBOX` answer that is not a valid JSON array counts as one label: its raw text.
- a question without respondents gives 0% for every row.
- when the list of options is known, the options that nobody picked are appended with a
  count of zero, in the order of the list.

## Input formats

The following providers are supported by `surveytally`:
* `analytics` the aggregated answers of a survey, as returned by the server
* `responses` a list of individual responses, as returned by the server
* `csv` Comma Separated Values, one column per question
* `xlsx` Excel spreadsheets, one column per question

### `analytics`

```text
{ "survey": { "id": 7, "title": "Team lunch", "status": "PUBLISHED" },
  "totalResponses": 4,
  "analytics": [
    { "questionId": 21, "questionTitle": "Which day works best?", "questionType": "RADIO",
      "totalAnswers": 4, "answers": ["Friday", "Thursday", "Friday", "Wednesday"] } ] }
```

### `responses`

A JSON array of responses. Each response carries its answers, and each answer the id,
title and type of its question. The answers are grouped by question.

### `csv` and `xlsx`

The header row holds the titles of the questions. Each following row is a respondent.
Columns that do not match a configured question are ignored, and a blank cell is a
skipped question. The questions must be listed in the configuration, with their type.

Multiple choices can be written as a JSON array (`["Async","Macros"]`) or as labels
separated with semicolons (`Async;Macros`), as exported by most form tools.

For Excel files, numbers are read as text (`5.0` is read as `5`). If the workbook has
more than one worksheet, the name of the worksheet must be provided.

## Configuration

```text
{
  "outputSettings": {
    "surveyTitle": "Rust workshop",
    "surveyDate": "2025-04-01",
    "outputPath": "summary.json"
  },
  "sources": [
    { "provider": "csv", "filePath": "feedback.csv", "headerRowIndex": 2 }
  ],
  "questions": [
    { "title": "Rating", "type": "RADIO", "options": ["1", "2", "3", "4", "5"] },
    { "title": "Suggestions", "type": "TEXTAREA" }
  ]
}
```

- `surveyDate` and `outputPath` are optional. `outputPath` is relative to the
  configuration file and is overridden by `--out`.
- `filePath` is relative to the configuration file.
- `headerRowIndex` (number or string, starting at 1, default 1) is the row of the titles.
  The rows above are skipped.
- `excelWorksheetName` selects the worksheet of an Excel file.
- `options` is the canonical list of options of a question, used for the rows with zero
  answers. It applies to all the providers.

When several sources are listed, their answers are added together. Questions are matched
by title.

## Summary

```text
{
  "config": { "survey": "Rust workshop", "date": "2025-04-01", "totalResponses": "4" },
  "results": [
    { "question": "Rating", "type": "RADIO", "totalAnswers": "4",
      "tally": [ { "option": "5", "count": "2", "percentage": "50.00", "bar": "50%" } ] },
    { "question": "Suggestions", "type": "TEXTAREA", "totalAnswers": "2",
      "answers": [ "More exercises", "Longer breaks, please" ] }
  ]
}
```

Numbers are written as strings. Percentages have two decimals, and `bar` is the
rounded percentage, ready to be used as the width of a bar.

*/

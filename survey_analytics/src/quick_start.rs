/*!

# Quick start

This example tabulates the answers of a survey from a spreadsheet exported by a form
tool. The survey has three questions: a rating from 1 to 5 (single choice), the topics
that were useful (multiple choice) and free comments.

**Getting the answers** Export the answers of the form to a CSV file. It should look like
the following:

```text
Timestamp,Rating,Topics,Suggestions
2025-04-01 10:00,5,Async;Macros,More exercises
2025-04-01 10:05,4,Async,
```

**Describing the survey** Tabular files do not say what type each question is. Write a
configuration file next to the CSV file:

```text
{
  "outputSettings": { "surveyTitle": "Rust workshop" },
  "sources": [ { "provider": "csv", "filePath": "feedback.csv" } ],
  "questions": [
    { "title": "Rating", "type": "RADIO", "options": ["1", "2", "3", "4", "5"] },
    { "title": "Topics", "type": "CHECKBOX" },
    { "title": "Suggestions", "type": "TEXTAREA" }
  ]
}
```

**Running the tally**

```bash
surveytally --config workshop.json --out summary.json
```

Use `--verbose` to see how each row was read. The summary lists each question with its
frequency table, or with its answers for the free text questions. See the
[manual](../manual/index.html) for the complete format.

**Answers from the server** The analytics document of a survey can be read directly,
without configuration:

```bash
surveytally -i analytics.json --input-type analytics
```

**Checking a result** A previous summary can be used as a reference. `surveytally` fails
and prints the differences if the summaries do not match:

```bash
surveytally --config workshop.json --reference summary.json
```

## Using the library

```
use survey_analytics::{aggregate, ChoiceKind};

let answers = ["[\"Red\",\"Blue\"]", "[\"Red\"]", "[\"Green\"]"];
let table = aggregate(ChoiceKind::Multi, 3, &answers);
assert_eq!(table[0].option, "Red");
assert_eq!(table[0].count, 2);
```

*/

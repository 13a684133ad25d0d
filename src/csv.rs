use crate::bank::AnswerKey;
use crate::error::{QuizError, Result};
use crate::models::QuestionRecord;
use ::csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::path::Path;

/// Leading columns before the options: prompt, answer, explanation.
const FIXED_COLUMNS: usize = 3;

/// Reads a CSV question file. Each record is
/// `prompt,answer,explanation,option1,option2[,...]`.
pub fn load_csv(path: &Path) -> Result<Vec<QuestionRecord>> {
    let content = fs::read_to_string(path)?;
    parse_csv_questions(&content)
}

/// Parses CSV question records. Quoted fields may contain commas, `""` and
/// line breaks. Blank lines and lines starting with `#` are skipped.
pub fn parse_csv_questions(content: &str) -> Result<Vec<QuestionRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let mut questions = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| QuizError::Csv {
            line: e.position().map_or(0, |p| p.line() as usize),
            message: e.to_string(),
        })?;
        let line_no = record.position().map_or(0, |p| p.line() as usize);
        if record.iter().all(str::is_empty) {
            continue;
        }
        questions.push(question_from_record(&record, questions.len(), line_no)?);
    }

    Ok(questions)
}

fn csv_error(line: usize, message: impl Into<String>) -> QuizError {
    QuizError::Csv {
        line,
        message: message.into(),
    }
}

fn question_from_record(
    record: &StringRecord,
    position: usize,
    line_no: usize,
) -> Result<QuestionRecord> {
    let prompt = record.get(0).unwrap_or_default();
    let answer = record.get(1).unwrap_or_default();
    let explanation = record.get(2).unwrap_or_default();

    // Column position is the answer index, so only trailing blanks may go.
    let mut options: Vec<String> = record
        .iter()
        .skip(FIXED_COLUMNS)
        .map(str::to_string)
        .collect();
    while options.last().is_some_and(|o| o.is_empty()) {
        options.pop();
    }

    if prompt.is_empty() {
        return Err(csv_error(line_no, "missing question prompt"));
    }
    if answer.is_empty() {
        return Err(csv_error(line_no, "missing answer column"));
    }
    if let Some(blank) = options.iter().position(String::is_empty) {
        return Err(csv_error(
            line_no,
            format!("option {} is empty", blank + 1),
        ));
    }
    if options.len() < 2 {
        return Err(csv_error(
            line_no,
            format!(
                "expected at least 2 options after the first {} columns, found {}",
                FIXED_COLUMNS,
                options.len()
            ),
        ));
    }

    let correct_index = resolve_answer(answer, &options, position, line_no)?;
    Ok(QuestionRecord::new(prompt, options, correct_index).with_explanation(explanation))
}

/// The answer column holds either a zero-based index or an option's text.
/// A value that reads both ways and points at two different options is
/// rejected rather than guessed.
fn resolve_answer(
    answer: &str,
    options: &[String],
    position: usize,
    line_no: usize,
) -> Result<usize> {
    let by_text = options.iter().position(|o| o == answer);
    let by_index = answer.parse::<usize>().ok().filter(|i| *i < options.len());

    match (by_index, by_text) {
        (Some(index), Some(text)) if index != text => Err(csv_error(
            line_no,
            format!(
                "answer {:?} is ambiguous: it is option {} by index and option {} by text",
                answer,
                index + 1,
                text + 1
            ),
        )),
        (_, Some(text)) => Ok(text),
        (Some(index), None) => Ok(index),
        (None, None) => match answer.parse::<usize>() {
            Ok(index) => AnswerKey::Index(index).resolve(options, position),
            Err(_) => AnswerKey::Text(answer.to_string()).resolve(options, position),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions_index_and_text_answers() {
        let content = "\
# prompt,answer,explanation,options...
What voltage is UK single-phase mains?,1,Nominal 230V.,110V,230V,400V

\"Which body enforces HASAWA?\",HSE,\"The Health and Safety Executive, or local authority.\",HSE,IET,Ofgem
";
        let questions = parse_csv_questions(content).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options, vec!["110V", "230V", "400V"]);
        assert_eq!(questions[0].correct_index, 1);
        assert_eq!(questions[0].explanation, "Nominal 230V.");
        assert_eq!(questions[1].correct_index, 0);
        assert_eq!(
            questions[1].explanation,
            "The Health and Safety Executive, or local authority."
        );
    }

    #[test]
    fn test_quoted_fields_with_commas_and_escaped_quotes() {
        let content = "\"In a CSV, what does a comma do?\",0,,\"Separates fields, unless quoted\",Nothing\n\
                       \"Is \"\"quoted\"\" text supported?\",1,,No,\"Yes, \"\"it works\"\"\"\n";
        let questions = parse_csv_questions(content).unwrap();
        assert_eq!(questions[0].prompt, "In a CSV, what does a comma do?");
        assert_eq!(questions[0].explanation, "");
        assert_eq!(questions[0].options[0], "Separates fields, unless quoted");
        assert_eq!(questions[1].prompt, "Is \"quoted\" text supported?");
        assert_eq!(questions[1].options[1], "Yes, \"it works\"");
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let content = "Q1,0,\"First line.\nSecond line.\",a,b\nQ2,1,,a,b\n";
        let questions = parse_csv_questions(content).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].explanation, "First line.\nSecond line.");
        assert_eq!(questions[1].correct_index, 1);
    }

    #[test]
    fn test_trailing_empty_options_are_dropped() {
        let questions = parse_csv_questions("Pick B,1,,A,B,,,\n").unwrap();
        assert_eq!(questions[0].options, vec!["A", "B"]);
        assert_eq!(questions[0].correct_option(), Some("B"));
    }

    #[test]
    fn test_empty_option_in_the_middle_is_rejected() {
        let err = parse_csv_questions("Q1,0,,a,b\nPick C,2,,A,,C,D\n").unwrap_err();
        match err {
            QuizError::Csv { line, message } => {
                assert_eq!(line, 2);
                assert_eq!(message, "option 2 is empty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numeric_options_answered_by_matching_index() {
        // "2" is both index 2 and the text of that same option
        let questions = parse_csv_questions("Pick two,2,,0,1,2\n").unwrap();
        assert_eq!(questions[0].correct_option(), Some("2"));
    }

    #[test]
    fn test_numeric_answer_that_reads_two_ways_is_rejected() {
        let err =
            parse_csv_questions("How many phases in a 3-phase supply?,3,,1,2,3,4\n").unwrap_err();
        assert!(matches!(err, QuizError::Csv { line: 1, ref message } if message.contains("ambiguous")));
    }

    #[test]
    fn test_numeric_text_answer_beyond_index_range() {
        let questions = parse_csv_questions("Nominal frequency in the UK?,50,,50,60\n").unwrap();
        assert_eq!(questions[0].correct_option(), Some("50"));
    }

    #[test]
    fn test_parse_questions_reports_line_numbers() {
        let content = "Q1,0,,a,b\n\nQ2,0,,only-one\n";
        let err = parse_csv_questions(content).unwrap_err();
        assert!(matches!(err, QuizError::Csv { line: 3, .. }));
    }

    #[test]
    fn test_index_out_of_range_is_caught_at_validation() {
        let questions = parse_csv_questions("Q1,5,,a,b\n").unwrap();
        assert_eq!(questions[0].correct_index, 5);
    }

    #[test]
    fn test_parse_questions_unknown_text_answer() {
        let err = parse_csv_questions("Q1,maybe,,yes,no").unwrap_err();
        assert!(matches!(err, QuizError::UnknownCorrectAnswer { question: 0, .. }));
    }

    #[test]
    fn test_parse_questions_missing_prompt() {
        let err = parse_csv_questions(",0,,a,b").unwrap_err();
        assert!(matches!(err, QuizError::Csv { line: 1, .. }));
    }

    #[test]
    fn test_load_csv_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.csv");
        fs::write(&path, "Which lamp is most efficient?,LED,,Halogen,LED,Incandescent\n").unwrap();

        let questions = load_csv(&path).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, 1);
    }
}

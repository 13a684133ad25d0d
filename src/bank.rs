//! Question-set files: discovery, JSON/TOML parsing and sampling.
//!
//! Authored content keys the right answer either by option index or by the
//! option's text. Both forms are resolved to an index here, at load time.

use crate::config::AppConfig;
use crate::csv::load_csv;
use crate::engine::QuestionSet;
use crate::error::{QuizError, Result};
use crate::models::{QuestionId, QuestionRecord};
use crate::scoring::GradeBands;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const QUIZ_EXTENSIONS: [&str; 3] = ["csv", "json", "toml"];

/// Correct answer as written in a question file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Index(usize),
    Text(String),
}

impl AnswerKey {
    /// Resolves the key against `options`. Text keys must match one option
    /// exactly, ignoring surrounding whitespace. Index keys are range-checked
    /// later by [`QuestionSet::new`].
    pub fn resolve(&self, options: &[String], question: usize) -> Result<usize> {
        match self {
            AnswerKey::Index(index) => Ok(*index),
            AnswerKey::Text(text) => options
                .iter()
                .position(|o| o.trim() == text.trim())
                .ok_or_else(|| QuizError::UnknownCorrectAnswer {
                    question,
                    answer: text.clone(),
                }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<QuestionId>,
    #[serde(alias = "prompt")]
    question: String,
    options: Vec<String>,
    #[serde(
        alias = "correctAnswer",
        alias = "correct_answer",
        alias = "correctIndex",
        alias = "correct_index"
    )]
    answer: AnswerKey,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl RawQuestion {
    fn into_record(self, position: usize) -> Result<QuestionRecord> {
        let correct_index = self.answer.resolve(&self.options, position)?;
        Ok(QuestionRecord {
            id: self.id,
            prompt: self.question,
            options: self.options,
            correct_index,
            explanation: self.explanation.unwrap_or_default(),
            topic: self.topic,
            category: self.category,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TitledQuestions {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "totalQuestions")]
    total_questions: Option<usize>,
    #[serde(default, alias = "timeLimit")]
    time_limit: Option<u64>,
    #[serde(default, alias = "passThreshold")]
    pass_threshold: Option<u8>,
    #[serde(default)]
    categories: Vec<String>,
    questions: Vec<RawQuestion>,
}

impl TitledQuestions {
    fn into_file(self) -> Result<QuestionFile> {
        Ok(QuestionFile {
            title: self.title,
            settings: ExamSettings {
                total_questions: self.total_questions.filter(|n| *n > 0),
                time_limit_secs: self.time_limit.filter(|s| *s > 0),
                pass_threshold: self.pass_threshold.map(|p| p.min(100)),
                categories: self.categories,
            },
            questions: resolve_all(self.questions)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonQuestionFile {
    Bare(Vec<RawQuestion>),
    Titled(TitledQuestions),
}

/// Mock-exam settings a titled question file may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamSettings {
    /// Questions drawn per attempt when the bank is larger.
    pub total_questions: Option<usize>,
    pub time_limit_secs: Option<u64>,
    /// Pass percentage for this exam, replacing the configured one.
    pub pass_threshold: Option<u8>,
    /// Groups to balance a drawn exam across, in display order.
    pub categories: Vec<String>,
}

impl ExamSettings {
    pub fn time_limit(&self) -> Option<chrono::Duration> {
        self.time_limit_secs
            .and_then(|s| i64::try_from(s).ok())
            .map(chrono::Duration::seconds)
    }

    /// `base` with this exam's pass threshold applied. The marginal band is
    /// lowered if it would sit above the new pass mark.
    pub fn bands(&self, base: GradeBands) -> GradeBands {
        match self.pass_threshold {
            Some(pass_mark) => GradeBands {
                pass_mark,
                marginal_mark: base.marginal_mark.min(pass_mark),
            },
            None => base,
        }
    }
}

/// Parsed contents of one question file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFile {
    pub title: Option<String>,
    pub settings: ExamSettings,
    pub questions: Vec<QuestionRecord>,
}

/// Questions read from one file, not yet validated as a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedQuiz {
    pub name: String,
    pub settings: ExamSettings,
    pub questions: Vec<QuestionRecord>,
}

fn resolve_all(raw: Vec<RawQuestion>) -> Result<Vec<QuestionRecord>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, q)| q.into_record(i))
        .collect()
}

pub fn parse_json_questions(content: &str) -> Result<QuestionFile> {
    match serde_json::from_str::<JsonQuestionFile>(content)? {
        JsonQuestionFile::Bare(raw) => Ok(QuestionFile {
            title: None,
            settings: ExamSettings::default(),
            questions: resolve_all(raw)?,
        }),
        JsonQuestionFile::Titled(file) => file.into_file(),
    }
}

pub fn parse_toml_questions(content: &str) -> Result<QuestionFile> {
    toml::from_str::<TitledQuestions>(content)?.into_file()
}

pub fn quiz_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_else(|| "Quiz".to_string())
}

/// Reads a `.csv`, `.json` or `.toml` question file.
pub fn load_question_file(path: &Path) -> Result<LoadedQuiz> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let file = match extension.as_str() {
        "csv" => QuestionFile {
            title: None,
            settings: ExamSettings::default(),
            questions: load_csv(path)?,
        },
        "json" => parse_json_questions(&fs::read_to_string(path)?)?,
        "toml" => parse_toml_questions(&fs::read_to_string(path)?)?,
        other => return Err(QuizError::UnsupportedFormat(other.to_string())),
    };

    debug!(path = %path.display(), questions = file.questions.len(), "Loaded question file");
    Ok(LoadedQuiz {
        name: file.title.unwrap_or_else(|| quiz_name(path)),
        settings: file.settings,
        questions: file.questions,
    })
}

/// Question files directly inside `dir`, sorted. A missing directory yields
/// an empty list.
pub fn get_quiz_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if dir.is_dir()
        && let Ok(entries) = fs::read_dir(dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(ext) = path.extension().and_then(|e| e.to_str())
                && QUIZ_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
            {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Draws up to `count` questions without replacement, spread as evenly as
/// the bank allows across groups (category, else topic). Groups named in
/// `categories` come first and take any remainder; questions with no group
/// form one group of their own. Options inside each question keep their
/// order.
pub fn sample_questions<R: Rng + ?Sized>(
    questions: Vec<QuestionRecord>,
    count: usize,
    categories: &[String],
    rng: &mut R,
) -> Vec<QuestionRecord> {
    let mut groups: Vec<(Option<String>, Vec<QuestionRecord>)> = categories
        .iter()
        .map(|c| (Some(c.clone()), Vec::new()))
        .collect();
    for question in questions {
        let key = question.group().map(str::to_string);
        match groups.iter().position(|(k, _)| *k == key) {
            Some(pos) => groups[pos].1.push(question),
            None => groups.push((key, vec![question])),
        }
    }

    let mut pools = Vec::with_capacity(groups.len());
    for (_, mut group) in groups {
        group.shuffle(rng);
        pools.push(group.into_iter());
    }

    let mut drawn = Vec::with_capacity(count);
    while drawn.len() < count {
        let before = drawn.len();
        for pool in pools.iter_mut() {
            if drawn.len() == count {
                break;
            }
            if let Some(question) = pool.next() {
                drawn.push(question);
            }
        }
        if drawn.len() == before {
            break;
        }
    }

    drawn.shuffle(rng);
    drawn
}

/// Applies sampling/shuffling and validates the result. The configured
/// `sample_size` wins over the file's `total_questions`.
pub fn prepare_question_set<R: Rng + ?Sized>(
    loaded: LoadedQuiz,
    config: &AppConfig,
    rng: &mut R,
) -> Result<QuestionSet> {
    let available = loaded.questions.len();
    let mut questions = loaded.questions;

    if let Some(size) = config.sample_size.or(loaded.settings.total_questions)
        && size < available
    {
        questions = sample_questions(questions, size, &loaded.settings.categories, rng);
        info!(quiz = %loaded.name, available, drawn = size, "Sampled questions from bank");
    } else if config.shuffle_questions {
        questions.shuffle(rng);
    }

    QuestionSet::new(questions)
}

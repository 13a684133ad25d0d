//! Results derived from an attempt: percentage, grade and per-question review.

use crate::engine::QuizEngine;
use serde::Deserialize;

/// Percentage thresholds for the pass/marginal/fail badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GradeBands {
    pub pass_mark: u8,
    pub marginal_mark: u8,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            pass_mark: 70,
            marginal_mark: 60,
        }
    }
}

impl GradeBands {
    pub fn grade(&self, percentage: u8) -> Grade {
        if percentage >= self.pass_mark {
            Grade::Pass
        } else if percentage >= self.marginal_mark {
            Grade::Marginal
        } else {
            Grade::Fail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Pass,
    Marginal,
    Fail,
}

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::Pass => "✓ Pass",
            Grade::Marginal => "⚠ Marginal",
            Grade::Fail => "✗ Fail",
        }
    }
}

/// `correct / total` as a whole percentage, rounded half up.
pub fn percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (correct.min(total) * 200 + total) / (total * 2);
    pct as u8
}

pub fn score_message(percentage: u8) -> &'static str {
    match percentage {
        80..=u8::MAX => "Excellent! You have a strong understanding of this section.",
        60..=79 => "Good work! You have a solid grasp of the basics with room for improvement.",
        40..=59 => "Fair effort. Consider reviewing the material to strengthen your understanding.",
        _ => "You may need to review the content more thoroughly before proceeding.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub index: usize,
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScore {
    pub topic: String,
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
    pub percentage: u8,
    pub grade: Grade,
    pub message: &'static str,
    pub reviews: Vec<QuestionReview>,
    pub topics: Vec<TopicScore>,
    pub timed_out: bool,
}

impl ScoreReport {
    pub fn from_engine(engine: &QuizEngine, bands: GradeBands) -> Self {
        let mut reviews = Vec::with_capacity(engine.question_count());
        let mut topics: Vec<TopicScore> = Vec::new();

        for (index, question) in engine.questions().iter().enumerate() {
            let selected = engine.selected_answer(index);
            let is_correct = selected == Some(question.correct_index);
            reviews.push(QuestionReview {
                index,
                selected,
                correct_index: question.correct_index,
                is_correct,
            });

            if let Some(topic) = question.group() {
                let pos = match topics.iter().position(|t| t.topic == topic) {
                    Some(pos) => pos,
                    None => {
                        topics.push(TopicScore {
                            topic: topic.to_string(),
                            correct: 0,
                            total: 0,
                        });
                        topics.len() - 1
                    }
                };
                let entry = &mut topics[pos];
                entry.total += 1;
                if is_correct {
                    entry.correct += 1;
                }
            }
        }

        let correct = engine.score();
        let total = engine.question_count();
        let percentage = percentage(correct, total);
        Self {
            correct,
            answered: engine.answered_count(),
            total,
            percentage,
            grade: bands.grade(percentage),
            message: score_message(percentage),
            reviews,
            topics,
            timed_out: engine.state().timed_out(),
        }
    }

    pub fn incorrect(&self) -> usize {
        self.reviews
            .iter()
            .filter(|r| r.selected.is_some() && !r.is_correct)
            .count()
    }

    pub fn unanswered(&self) -> usize {
        self.total - self.answered
    }
}

//! crates/mindcare_core/src/assessment.rs
//!
//! The self-assessment questionnaire and its scoring.
//!
//! Eight PHQ/GAD-style questions are answered on a 0 to 3 scale. The total is
//! expressed as a percentage of the maximum and mapped to a [`Band`], each with a
//! fixed message and recommendation list.

use crate::validation::ValidationError;

pub const QUESTION_COUNT: usize = 8;

/// The highest value a single answer can take.
pub const MAX_ANSWER: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u8,
    pub text: &'static str,
}

pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        id: 1,
        text: "How often have you felt down, depressed, or hopeless in the past 2 weeks?",
    },
    Question {
        id: 2,
        text: "How often have you had little interest or pleasure in doing things?",
    },
    Question {
        id: 3,
        text: "How often have you felt nervous, anxious, or on edge?",
    },
    Question {
        id: 4,
        text: "How often have you been unable to stop or control worrying?",
    },
    Question {
        id: 5,
        text: "How often have you had trouble falling or staying asleep?",
    },
    Question {
        id: 6,
        text: "How often have you felt tired or had little energy?",
    },
    Question {
        id: 7,
        text: "How often have you had poor appetite or overeating?",
    },
    Question {
        id: 8,
        text: "How often have you had trouble concentrating on things?",
    },
];

/// Answer values and their labels, shared by every question.
pub const ANSWER_OPTIONS: [(u8, &str); 4] = [
    (0, "Not at all"),
    (1, "Several days"),
    (2, "More than half the days"),
    (3, "Nearly every day"),
];

//=========================================================================================
// Bands
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Low,
    Mild,
    Moderate,
    High,
}

impl Band {
    /// Selects the band for `total` out of `questions * MAX_ANSWER`.
    ///
    /// Lower bounds are inclusive: exactly 25% is `Mild`, exactly 50% is
    /// `Moderate`, exactly 75% is `High`. The comparison is done on integers
    /// (`percentage < 25` is `4 * total < max`), so boundaries are exact.
    pub fn for_total(total: u32, questions: u32) -> Self {
        let max = u64::from(questions) * u64::from(MAX_ANSWER);
        let quarters = 4 * u64::from(total);
        if quarters < max {
            Self::Low
        } else if quarters < 2 * max {
            Self::Mild
        } else if quarters < 3 * max {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Low => "Your mental health appears to be in good shape. Keep up the good work!",
            Self::Mild => "You may be experiencing some mild symptoms. Consider practicing self-care techniques.",
            Self::Moderate => "You may be experiencing moderate symptoms. It might be helpful to seek support.",
            Self::High => "You may be experiencing significant symptoms. Please consider seeking professional help.",
        }
    }

    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            Self::Low => &[
                "Continue practicing self-care",
                "Maintain healthy routines",
                "Stay connected with friends and family",
            ],
            Self::Mild => &[
                "Try mindfulness and meditation",
                "Ensure adequate sleep",
                "Engage in regular physical activity",
                "Consider talking to someone you trust",
            ],
            Self::Moderate => &[
                "Consider speaking with a counselor or therapist",
                "Practice stress management techniques",
                "Maintain a regular sleep schedule",
                "Connect with support groups",
                "Use the resources section for additional help",
            ],
            Self::High => &[
                "Reach out to a mental health professional",
                "Contact crisis support if needed",
                "Talk to someone you trust",
                "Use the support resources available",
                "Consider speaking with your school counselor",
            ],
        }
    }
}

//=========================================================================================
// Answers
//=========================================================================================

/// Answers collected while the questionnaire is in progress, keyed by question id 1..=8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: [Option<u8>; QUESTION_COUNT],
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or changes) the answer to `question`.
    pub fn answer(&mut self, question: u8, value: u8) -> Result<(), ValidationError> {
        let slot = usize::from(question)
            .checked_sub(1)
            .and_then(|index| self.answers.get_mut(index))
            .ok_or(ValidationError::OutOfRange {
                field: "question",
                min: 1,
                max: QUESTION_COUNT as i64,
                value: i64::from(question),
            })?;
        if value > MAX_ANSWER {
            return Err(ValidationError::OutOfRange {
                field: "answer",
                min: 0,
                max: i64::from(MAX_ANSWER),
                value: i64::from(value),
            });
        }
        *slot = Some(value);
        Ok(())
    }

    pub fn get(&self, question: u8) -> Option<u8> {
        let index = usize::from(question).checked_sub(1)?;
        self.answers.get(index).copied().flatten()
    }

    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == QUESTION_COUNT
    }

    /// Freezes the sheet for scoring. Partial sheets are refused.
    pub fn complete(&self) -> Result<CompletedAnswers, ValidationError> {
        let mut values = [0u8; QUESTION_COUNT];
        for (value, answer) in values.iter_mut().zip(self.answers) {
            *value = answer.ok_or(ValidationError::IncompleteAssessment {
                answered: self.answered(),
                expected: QUESTION_COUNT,
            })?;
        }
        Ok(CompletedAnswers(values))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A full set of answers, the only input the scorer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedAnswers([u8; QUESTION_COUNT]);

impl CompletedAnswers {
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&v| u32::from(v)).sum()
    }
}

//=========================================================================================
// Scoring
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResult {
    pub band: Band,
    pub total: u32,
    pub max_score: u32,
    pub percentage: f64,
}

impl AssessmentResult {
    pub fn message(&self) -> &'static str {
        self.band.message()
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        self.band.recommendations()
    }
}

/// Scores a complete answer set.
pub fn score(answers: &CompletedAnswers) -> AssessmentResult {
    score_total(answers.total(), QUESTION_COUNT as u32)
}

/// Scores a raw total over `questions` questions.
pub fn score_total(total: u32, questions: u32) -> AssessmentResult {
    let max_score = questions * u32::from(MAX_ANSWER);
    let percentage = if max_score == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(max_score) * 100.0
    };
    AssessmentResult {
        band: Band::for_total(total, questions),
        total,
        max_score,
        percentage,
    }
}

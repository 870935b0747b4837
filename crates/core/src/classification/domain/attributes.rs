use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LabelError {
    #[error("{model} model returned {actual} scores, expected {expected}")]
    ScoreCount {
        model: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Gender label set, in the classifier's output index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: &[Gender] = &[Gender::Male, Gender::Female];

    pub fn from_scores(scores: &[f32]) -> Result<Self, LabelError> {
        pick(Self::ALL, scores, "gender")
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// The eight age brackets the age model distinguishes, youngest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AgeBracket {
    Infant,
    EarlyChild,
    Child,
    Teen,
    YoungAdult,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeBracket {
    pub const ALL: &[AgeBracket] = &[
        AgeBracket::Infant,
        AgeBracket::EarlyChild,
        AgeBracket::Child,
        AgeBracket::Teen,
        AgeBracket::YoungAdult,
        AgeBracket::Adult,
        AgeBracket::MiddleAged,
        AgeBracket::Senior,
    ];

    pub fn from_scores(scores: &[f32]) -> Result<Self, LabelError> {
        pick(Self::ALL, scores, "age")
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::Infant => "(0-2)",
            AgeBracket::EarlyChild => "(4-6)",
            AgeBracket::Child => "(8-12)",
            AgeBracket::Teen => "(15-20)",
            AgeBracket::YoungAdult => "(25-32)",
            AgeBracket::Adult => "(38-43)",
            AgeBracket::MiddleAged => "(48-53)",
            AgeBracket::Senior => "(60-100)",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifier verdict for one face in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub gender: Gender,
    pub age: AgeBracket,
}

impl fmt::Display for Attributes {
    /// Overlay label, e.g. `Female, (25-32)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.gender, self.age)
    }
}

/// Index of the highest score; the first index wins ties.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

fn pick<T: Copy>(labels: &[T], scores: &[f32], model: &'static str) -> Result<T, LabelError> {
    let count_error = LabelError::ScoreCount {
        model,
        expected: labels.len(),
        actual: scores.len(),
    };
    if scores.len() != labels.len() {
        return Err(count_error);
    }
    argmax(scores).map(|i| labels[i]).ok_or(count_error)
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{GradedAnswer, Question, Quiz},
        dto::request::AnswerInput,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeOutcome {
    pub answers: Vec<GradedAnswer>,
    pub score: i32,
    pub total_marks: i32,
    pub is_passed: bool,
    pub time_spent: i64,
}

/// Grades a complete submission against the live question set of `quiz`.
///
/// Every check runs before any mark is computed, so a returned error means
/// nothing was graded. Questions are graded in the order given, which callers
/// keep ascending by `Question::order`. Each question is all-or-nothing: the
/// selected option's `is_correct` flag awards the full marks or zero.
pub fn grade(
    quiz: &Quiz,
    questions: &[Question],
    answers: &[AnswerInput],
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<GradeOutcome> {
    if questions.is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "Quiz '{}' has no questions",
            quiz.id
        )));
    }

    if answers.len() != questions.len() {
        return Err(AppError::InvalidRequest(format!(
            "Expected {} answers, received {}",
            questions.len(),
            answers.len()
        )));
    }

    let answer_map: HashMap<&str, &AnswerInput> = answers
        .iter()
        .map(|a| (a.question_id.as_str(), a))
        .collect();

    if let Some(missing) = questions
        .iter()
        .find(|q| !answer_map.contains_key(q.id.as_str()))
    {
        return Err(AppError::InvalidRequest(format!(
            "Missing answer for question '{}'",
            missing.id
        )));
    }

    let question_map: HashMap<&str, &Question> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();

    for answer in answers {
        let valid = question_map
            .get(answer.question_id.as_str())
            .map(|q| q.option(&answer.selected_option_id).is_some())
            .unwrap_or(false);

        if !valid {
            return Err(AppError::InvalidRequest(format!(
                "Option '{}' is not a valid selection for question '{}'",
                answer.selected_option_id, answer.question_id
            )));
        }
    }

    let mut score = 0;
    let mut total_marks = 0;
    let mut graded = Vec::with_capacity(questions.len());

    for question in questions {
        total_marks += question.marks;

        let answer = answer_map[question.id.as_str()];
        let is_correct = question
            .option(&answer.selected_option_id)
            .map(|o| o.is_correct)
            .unwrap_or(false);
        let marks_awarded = if is_correct { question.marks } else { 0 };
        score += marks_awarded;

        graded.push(GradedAnswer {
            question_id: question.id.clone(),
            selected_option_id: answer.selected_option_id.clone(),
            is_correct,
            marks_awarded,
        });
    }

    Ok(GradeOutcome {
        answers: graded,
        score,
        total_marks,
        is_passed: quiz.is_passing_score(score),
        time_spent: elapsed_seconds(started_at, now),
    })
}

/// Whole seconds between start and submission. A start time in the future
/// yields zero.
pub fn elapsed_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - started_at).num_seconds();
    if elapsed < 0 {
        log::warn!(
            "Attempt start time {} is after submission time {}; recording zero time spent",
            started_at,
            now
        );
        return 0;
    }
    elapsed
}

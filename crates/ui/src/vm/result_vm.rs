use quiz_core::model::{ScoreBand, SubmissionResult};

use crate::vm::time_fmt::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_text: String,
    pub band: ScoreBand,
    pub headline: &'static str,
    pub correct_text: String,
    pub time_text: String,
    pub strong_points: Vec<String>,
    pub weak_points: Vec<String>,
    pub recommendation: &'static str,
    pub result_id: Option<u64>,
}

impl ResultVm {
    #[must_use]
    pub fn new(result: &SubmissionResult, time_taken_secs: u32) -> Self {
        let band = result.band();
        Self {
            score_text: format!("{:.1}%", result.score),
            band,
            headline: headline(band),
            correct_text: format!("{}/{}", result.correct_answers, result.total_questions),
            time_text: format_elapsed(time_taken_secs),
            strong_points: result.strong_points.clone(),
            weak_points: result.weak_points.clone(),
            recommendation: if result.has_weak_points() {
                "Practice more on your weak areas to improve your score."
            } else {
                "Great job! Keep practicing to maintain your skills."
            },
            result_id: result.result_id,
        }
    }
}

fn headline(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Excellent => "Excellent!",
        ScoreBand::Good => "Good job!",
        ScoreBand::KeepPracticing => "Keep practicing!",
    }
}

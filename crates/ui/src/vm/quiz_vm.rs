use quiz_core::model::{AgeGroup, TimerLevel};
use services::{SessionSnapshot, SessionStatus};

use crate::vm::time_fmt::format_countdown;

/// Label of the forward navigation button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextLabel {
    Next,
    Submit,
}

impl NextLabel {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Submit => "Submit Test",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorVm {
    pub number: usize,
    pub current: bool,
    pub answered: bool,
}

/// Display-ready state of the quiz screen.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    pub title: String,
    pub meta: String,
    pub lines: Vec<String>,
    pub options: Vec<OptionVm>,
    pub counter: String,
    pub progress_percent: f64,
    pub progress_text: String,
    pub answered_text: String,
    pub timer_text: String,
    pub timer_level: TimerLevel,
    pub age_group: AgeGroup,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub next_label: NextLabel,
    pub submitting: bool,
    pub indicators: Vec<IndicatorVm>,
}

impl QuizVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let position = snapshot.index + 1;
        let progress_percent = snapshot.progress * 100.0;

        let (meta, lines, options) = match &snapshot.question {
            Some(question) => (
                format!(
                    "{} | Difficulty: {}",
                    question.category(),
                    "★".repeat(usize::from(question.difficulty()))
                ),
                question.lines().into_iter().map(str::to_owned).collect(),
                question
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(index, text)| OptionVm {
                        index,
                        letter: option_letter(index),
                        text: text.clone(),
                        selected: snapshot.selection == Some(index),
                    })
                    .collect(),
            ),
            None => (String::new(), Vec::new(), Vec::new()),
        };

        Self {
            title: format!("Question {position}"),
            meta,
            lines,
            options,
            counter: format!("Question {position} of {}", snapshot.total),
            progress_percent,
            progress_text: format!("{}% Complete", progress_percent.round()),
            answered_text: format!("{} / {} answered", snapshot.answered, snapshot.total),
            timer_text: format_countdown(snapshot.time_remaining),
            timer_level: snapshot.timer_level,
            age_group: snapshot.age_group,
            prev_enabled: snapshot.can_go_back,
            next_enabled: snapshot.can_navigate,
            next_label: if snapshot.is_last {
                NextLabel::Submit
            } else {
                NextLabel::Next
            },
            submitting: snapshot.status == SessionStatus::Submitting,
            indicators: snapshot
                .indicators
                .iter()
                .map(|indicator| IndicatorVm {
                    number: indicator.index + 1,
                    current: indicator.is_current,
                    answered: indicator.is_answered,
                })
                .collect(),
        }
    }
}

fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map_or('?', char::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ChildId, Question, QuestionId};
    use services::{QuizConfig, QuizSession};

    fn session(n: u64) -> QuizSession {
        let questions = (1..=n)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    "Analogical Reasoning",
                    "analogical_reasoning",
                    2,
                    "Bird is to fly as fish is to…<br>?",
                    vec!["swim".into(), "run".into(), "climb".into()],
                )
                .unwrap()
            })
            .collect();
        QuizSession::initialize(QuizConfig::new(ChildId::new(1), AgeGroup::Middle), questions)
            .unwrap()
    }

    #[test]
    fn first_question_labels() {
        let mut session = session(4);
        session.select_answer(0).unwrap();
        let vm = QuizVm::from_snapshot(&session.snapshot());

        assert_eq!(vm.counter, "Question 1 of 4");
        assert_eq!(vm.progress_text, "25% Complete");
        assert_eq!(vm.timer_text, "30:00");
        assert_eq!(vm.meta, "Analogical Reasoning | Difficulty: ★★");
        assert_eq!(vm.lines, vec!["Bird is to fly as fish is to…", "?"]);
        assert!(!vm.prev_enabled);
        assert_eq!(vm.next_label, NextLabel::Next);
        assert_eq!(vm.options[0].letter, 'A');
        assert!(vm.options[0].selected);
        assert!(!vm.options[1].selected);
        assert_eq!(vm.answered_text, "1 / 4 answered");
    }

    #[test]
    fn last_question_offers_submit() {
        let mut session = session(3);
        session.jump_to(2).unwrap();
        let vm = QuizVm::from_snapshot(&session.snapshot());

        assert_eq!(vm.next_label.text(), "Submit Test");
        assert_eq!(vm.progress_text, "100% Complete");
        assert!(vm.prev_enabled);
        assert!(vm.indicators[2].current);
    }

    #[test]
    fn submitting_disables_navigation() {
        let mut session = session(2);
        session.begin_submission().unwrap();
        let vm = QuizVm::from_snapshot(&session.snapshot());

        assert!(vm.submitting);
        assert!(!vm.prev_enabled);
        assert!(!vm.next_enabled);
    }

    #[test]
    fn option_letters_run_past_d() {
        assert_eq!(option_letter(4), 'E');
        assert_eq!(option_letter(30), '?');
    }
}

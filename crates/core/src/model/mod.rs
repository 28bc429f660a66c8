mod age_group;
mod answer;
mod ids;
mod question;
mod report;

pub use age_group::{AgeGroup, ParseAgeGroupError, TimerLevel, TimerThresholds};
pub use answer::{Answer, AnswerSheet};
pub use ids::{ChildId, ParseIdError, QuestionId};
pub use question::{Question, QuestionError, QuestionRecord, QuestionSet, QuestionSetError};
pub use report::{ScoreBand, SubmissionResult};

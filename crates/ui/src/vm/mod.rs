mod quiz_vm;
mod result_vm;
mod session_vm;
mod time_fmt;

pub use quiz_vm::{IndicatorVm, NextLabel, OptionVm, QuizVm};
pub use result_vm::ResultVm;
pub use session_vm::{QuizIntent, QuizOutcome, QuizScreen, start_quiz};
pub use time_fmt::{format_countdown, format_elapsed};

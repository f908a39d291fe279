pub mod attempt;
pub mod question;
pub mod quiz;
pub use attempt::{Attempt, GradedAnswer};
pub use question::{Question, QuestionOption};
pub use quiz::Quiz;

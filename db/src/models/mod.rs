pub mod assignment;
pub mod assignment_question;
pub mod assignment_submission;
pub mod code_question;
pub mod code_question_testcase;
pub mod code_submission;
pub mod code_submission_result;
pub mod course_offering;
pub mod submission_grade;
pub mod user;

pub use assignment::Entity as Assignment;
pub use assignment_question::Entity as AssignmentQuestion;
pub use assignment_submission::Entity as AssignmentSubmission;
pub use code_question::Entity as CodeQuestion;
pub use code_question_testcase::Entity as CodeQuestionTestcase;
pub use code_submission::Entity as CodeSubmission;
pub use code_submission_result::Entity as CodeSubmissionResult;
pub use course_offering::Entity as CourseOffering;
pub use submission_grade::Entity as SubmissionGrade;
pub use user::Entity as User;

use db::models::{code_question_testcase, code_submission, code_submission_result};
use judge::{CodeExecutor, RunResult, outputs_match};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use util::languages::Language;

use crate::error::EvaluateError;
use crate::inputs;

/// Outcome of one hidden test case, as persisted to
/// `code_submission_results`.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub testcase_id: i64,
    pub passed: bool,
    pub student_output: Option<String>,
    pub error_output: Option<String>,
    pub execution_time_ms: Option<i64>,
}

/// Aggregate of one evaluation run.
///
/// `skipped` counts cases with no usable input; they produce no result row
/// and are not part of `total`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub passed: usize,
    pub skipped: usize,
    pub cases: Vec<CaseReport>,
    #[serde(skip)]
    pub last_stdout: Option<String>,
}

impl EvaluationSummary {
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }

    /// JSON stored on `code_submissions.test_results`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total": self.total,
            "passed": self.passed,
            "skipped": self.skipped,
            "cases": self.cases,
        })
    }
}

/// One sample-case run for the student-facing "Run Code" flow.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRun {
    pub testcase_id: i64,
    pub stdin: String,
    pub expected_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RunResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs every hidden test case of `question_id` against the code stored on
/// `code_submission`, upserting one result row per executed case and then
/// overwriting the submission's summary fields.
///
/// Cases run sequentially in ascending id order. A case that fails to
/// execute (judge unreachable, poll timeout) is recorded as failed with the
/// error message and does not abort the remaining cases. Comparison is
/// always the orchestrator's own trimmed-equality against the case's
/// expected value, independent of any judge-side comparison.
pub async fn evaluate_hidden_cases(
    db: &DatabaseConnection,
    executor: &dyn CodeExecutor,
    code_submission: &code_submission::Model,
    question_id: i64,
) -> Result<EvaluationSummary, EvaluateError> {
    let language: Language = code_submission
        .language
        .parse()
        .map_err(|_| EvaluateError::UnsupportedLanguage(code_submission.language.clone()))?;

    let cases = code_question_testcase::Model::hidden_for_question(db, question_id).await?;

    let mut summary = EvaluationSummary {
        total: 0,
        passed: 0,
        skipped: 0,
        cases: Vec::with_capacity(cases.len()),
        last_stdout: None,
    };

    for case in &cases {
        let Some(stdin) =
            inputs::resolve(case.input_text.as_deref(), case.input_path.as_deref())
        else {
            tracing::debug!(testcase_id = case.id, "skipping test case with no usable input");
            summary.skipped += 1;
            continue;
        };

        let expected =
            inputs::resolve(case.expected_text.as_deref(), case.expected_path.as_deref())
                .unwrap_or_default();

        let report = match executor
            .execute(&code_submission.code, language, &stdin, None)
            .await
        {
            Ok(result) => {
                let stdout = result.stdout.clone().unwrap_or_default();
                let passed = outputs_match(&stdout, &expected);
                summary.last_stdout = Some(stdout.clone());
                CaseReport {
                    testcase_id: case.id,
                    passed,
                    student_output: Some(stdout),
                    error_output: result.error_output(),
                    execution_time_ms: result.execution_time_ms(),
                }
            }
            Err(err) => {
                tracing::warn!(
                    testcase_id = case.id,
                    code_submission_id = code_submission.id,
                    %err,
                    "test case execution failed"
                );
                CaseReport {
                    testcase_id: case.id,
                    passed: false,
                    student_output: None,
                    error_output: Some(err.to_string()),
                    execution_time_ms: None,
                }
            }
        };

        code_submission_result::Model::upsert(
            db,
            code_submission.id,
            case.id,
            code_submission_result::CaseOutcome {
                passed: report.passed,
                student_output: report.student_output.clone(),
                error_output: report.error_output.clone(),
                execution_time_ms: report.execution_time_ms,
            },
        )
        .await?;

        summary.total += 1;
        if report.passed {
            summary.passed += 1;
        }
        summary.cases.push(report);
    }

    code_submission::Model::store_summary(
        db,
        code_submission.id,
        summary.to_json(),
        summary.last_stdout.clone(),
    )
    .await?;

    tracing::info!(
        code_submission_id = code_submission.id,
        question_id,
        passed = summary.passed,
        total = summary.total,
        skipped = summary.skipped,
        "hidden test evaluation finished"
    );

    Ok(summary)
}

/// Runs the **sample** cases of a question against ad-hoc code, persisting
/// nothing. The expected output is forwarded to the executor so each
/// `RunResult` carries `passed`.
pub async fn run_sample_cases(
    db: &DatabaseConnection,
    executor: &dyn CodeExecutor,
    question_id: i64,
    language: Language,
    code: &str,
) -> Result<Vec<SampleRun>, EvaluateError> {
    let cases = code_question_testcase::Model::samples_for_question(db, question_id).await?;

    let mut runs = Vec::with_capacity(cases.len());
    for case in &cases {
        let Some(stdin) =
            inputs::resolve(case.input_text.as_deref(), case.input_path.as_deref())
        else {
            continue;
        };
        let expected =
            inputs::resolve(case.expected_text.as_deref(), case.expected_path.as_deref());

        match executor
            .execute(code, language, &stdin, expected.as_deref())
            .await
        {
            Ok(result) => runs.push(SampleRun {
                testcase_id: case.id,
                stdin,
                expected_output: expected,
                result: Some(result),
                error: None,
            }),
            Err(err) => runs.push(SampleRun {
                testcase_id: case.id,
                stdin,
                expected_output: expected,
                result: None,
                error: Some(err.to_string()),
            }),
        }
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::assignment::AssignmentType;
    use db::models::user::Role;
    use db::models::{assignment_submission, code_submission};
    use db::test_utils::{factory, setup_test_db};
    use judge::test_support::ScriptedExecutor;
    use sea_orm::EntityTrait;

    struct Fixture {
        db: DatabaseConnection,
        question_id: i64,
        code_submission: code_submission::Model,
    }

    /// Seeds a code assignment with one question and returns a saved code
    /// submission for it. Test cases are added per test.
    async fn fixture() -> Fixture {
        let db = setup_test_db().await;
        let faculty = factory::seed_user(&db, "f@uni.test", Role::Faculty).await;
        let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
        let offering = factory::seed_offering(&db, faculty.id).await;
        let assignment =
            factory::seed_assignment(&db, offering.id, AssignmentType::Code, false).await;
        let question = factory::seed_question(&db, faculty.id).await;
        let link = factory::link_question(&db, assignment.id, question.id, 10).await;
        let submission =
            assignment_submission::Model::get_or_create(&db, &assignment, student.id)
                .await
                .unwrap();
        let code_submission = code_submission::Model::upsert(
            &db,
            submission.id,
            Some(link.id),
            "python",
            "n = int(input())\nprint(n * n)\n",
        )
        .await
        .unwrap();

        Fixture {
            db,
            question_id: question.id,
            code_submission,
        }
    }

    #[tokio::test]
    async fn all_hidden_cases_pass_for_correct_code() {
        let fx = fixture().await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("2"), Some("4")).await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("3"), Some("9")).await;

        let executor = ScriptedExecutor::new()
            .with_output("2", "4")
            .with_output("3", "9");

        let summary =
            evaluate_hidden_cases(&fx.db, &executor, &fx.code_submission, fx.question_id)
                .await
                .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 2);
        assert!(summary.all_passed());

        let rows = db::models::code_submission_result::Model::for_code_submission(
            &fx.db,
            fx.code_submission.id,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.passed));

        // Summary lands on the code submission row as an aggregate.
        let refreshed = db::models::CodeSubmission::find_by_id(fx.code_submission.id)
            .one(&fx.db)
            .await
            .unwrap()
            .unwrap();
        let json = refreshed.test_results.unwrap();
        assert_eq!(json["passed"], 2);
        assert_eq!(json["total"], 2);
        assert_eq!(refreshed.run_output.as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn expected_with_trailing_newline_still_passes() {
        let fx = fixture().await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("2"), Some("4\n")).await;

        let executor = ScriptedExecutor::new().with_output("2", "4");
        let summary =
            evaluate_hidden_cases(&fx.db, &executor, &fx.code_submission, fx.question_id)
                .await
                .unwrap();

        assert_eq!(summary.passed, 1);
    }

    #[tokio::test]
    async fn wrong_output_fails_the_case() {
        let fx = fixture().await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("2"), Some("4")).await;

        let executor = ScriptedExecutor::new().with_output("2", "5");
        let summary =
            evaluate_hidden_cases(&fx.db, &executor, &fx.code_submission, fx.question_id)
                .await
                .unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.passed, 0);
    }

    #[tokio::test]
    async fn inputless_case_is_skipped_without_a_result_row() {
        let fx = fixture().await;
        factory::seed_testcase(&fx.db, fx.question_id, false, None, Some("4")).await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("3"), Some("9")).await;

        let executor = ScriptedExecutor::new().with_output("3", "9");
        let summary =
            evaluate_hidden_cases(&fx.db, &executor, &fx.code_submission, fx.question_id)
                .await
                .unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(executor.calls(), vec!["3".to_string()]);

        let rows = db::models::code_submission_result::Model::for_code_submission(
            &fx.db,
            fx.code_submission.id,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn one_failing_execution_does_not_abort_the_rest() {
        let fx = fixture().await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("2"), Some("4")).await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("3"), Some("9")).await;

        let executor = ScriptedExecutor::new()
            .failing_on("2")
            .with_output("3", "9");

        let summary =
            evaluate_hidden_cases(&fx.db, &executor, &fx.code_submission, fx.question_id)
                .await
                .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);

        let rows = db::models::code_submission_result::Model::for_code_submission(
            &fx.db,
            fx.code_submission.id,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);
        let failed = rows.iter().find(|r| !r.passed).unwrap();
        assert!(failed.error_output.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn rerunning_refreshes_rows_instead_of_duplicating() {
        let fx = fixture().await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("2"), Some("4")).await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("3"), Some("9")).await;

        let wrong = ScriptedExecutor::new().with_output("2", "0").with_output("3", "0");
        evaluate_hidden_cases(&fx.db, &wrong, &fx.code_submission, fx.question_id)
            .await
            .unwrap();

        let right = ScriptedExecutor::new().with_output("2", "4").with_output("3", "9");
        let summary =
            evaluate_hidden_cases(&fx.db, &right, &fx.code_submission, fx.question_id)
                .await
                .unwrap();

        assert_eq!(summary.passed, 2);

        let rows = db::models::code_submission_result::Model::for_code_submission(
            &fx.db,
            fx.code_submission.id,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.passed));
    }

    #[tokio::test]
    async fn sample_runs_touch_only_sample_cases_and_persist_nothing() {
        let fx = fixture().await;
        factory::seed_testcase(&fx.db, fx.question_id, true, Some("2"), Some("4")).await;
        factory::seed_testcase(&fx.db, fx.question_id, false, Some("3"), Some("9")).await;

        let executor = ScriptedExecutor::new().with_output("2", "4");
        let runs = run_sample_cases(
            &fx.db,
            &executor,
            fx.question_id,
            Language::Python,
            "n = int(input())\nprint(n * n)\n",
        )
        .await
        .unwrap();

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].stdin, "2");
        assert_eq!(runs[0].result.as_ref().unwrap().passed, Some(true));
        assert_eq!(executor.calls(), vec!["2".to_string()]);

        let rows = db::models::code_submission_result::Model::for_code_submission(
            &fx.db,
            fx.code_submission.id,
        )
        .await
        .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unknown_stored_language_is_rejected() {
        let fx = fixture().await;
        let mut tampered = fx.code_submission.clone();
        tampered.language = "cobol".to_string();

        let executor = ScriptedExecutor::new();
        let err = evaluate_hidden_cases(&fx.db, &executor, &tampered, fx.question_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluateError::UnsupportedLanguage(_)));
    }
}

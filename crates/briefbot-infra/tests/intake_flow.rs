//! End-to-end intake flow against the real SQLite store.
//!
//! Drives three step submissions through the intake service the way the
//! platform's callbacks would, with the token as the only state carried
//! between calls, and checks the persisted record.

use briefbot_core::repository::campaign::CampaignRepository;
use briefbot_core::service::intake::{IntakeOutcome, IntakeService};
use briefbot_core::service::notifier::Notifier;
use briefbot_infra::sqlite::{DatabasePool, SqliteCampaignRepository};
use briefbot_types::error::NotifyError;
use briefbot_types::field::{FieldKey, FieldValue, StepValues};
use briefbot_types::record::{FieldShape, FieldSpec, RecordValue};
use briefbot_types::session::{FlowState, StateToken};

use std::sync::Mutex;

/// Collects messages instead of calling the chat API.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, _user_id: &str, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn step_with(block: &str, action: &str, value: FieldValue) -> StepValues {
    let mut step = StepValues::new();
    step.insert(block, action, value);
    step
}

fn campaign_specs() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            "campaign_name",
            FieldKey::new("name_block", "name_input"),
            FieldShape::Text,
        )
        .required(),
        FieldSpec::new(
            "kpis",
            FieldKey::new("kpis_block", "kpis_input"),
            FieldShape::StructuredArray,
        ),
        FieldSpec::new(
            "budget",
            FieldKey::new("budget_block", "budget_input"),
            FieldShape::Integer,
        ),
        FieldSpec::new(
            "channels",
            FieldKey::new("channels_block", "channels_select"),
            FieldShape::StringArray,
        ),
    ]
}

async fn sqlite_service(
    dir: &tempfile::TempDir,
) -> IntakeService<SqliteCampaignRepository, RecordingNotifier> {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("intake.db").display());
    let pool = DatabasePool::new(&url).await.unwrap();
    IntakeService::new(
        SqliteCampaignRepository::new(pool),
        RecordingNotifier::default(),
        3,
        "v1",
    )
}

#[tokio::test]
async fn three_step_flow_persists_coerced_record() {
    // Idempotent across tests in this binary; a second call is an error we
    // can ignore.
    let _ = briefbot_observe::tracing_setup::init_tracing(false);

    let dir = tempfile::tempdir().unwrap();
    let svc = sqlite_service(&dir).await;

    let out = svc
        .handle_step(
            "U42",
            None,
            step_with("name_block", "name_input", FieldValue::Text("Acme Launch".into())),
        )
        .await;
    let (token, flow) = match out {
        IntakeOutcome::Advanced { token, flow, .. } => (token, flow),
        other => panic!("expected Advanced, got {other:?}"),
    };
    assert_eq!(flow, FlowState::AwaitingStep(2));

    let mut step2 = StepValues::new();
    step2.insert(
        "kpis_block",
        "kpis_input",
        FieldValue::Text("CTR: 2%\nLaunch: 2025-06-01: kickoff".into()),
    );
    step2.insert("budget_block", "budget_input", FieldValue::Text("1500".into()));
    let out = svc.handle_step("U42", Some(&token), step2).await;
    let (token, flow) = match out {
        IntakeOutcome::Advanced { token, flow, .. } => (token, flow),
        other => panic!("expected Advanced, got {other:?}"),
    };
    assert_eq!(flow, FlowState::AwaitingFinalStep);

    let out = svc
        .handle_final(
            "U42",
            Some(&token),
            step_with(
                "channels_block",
                "channels_select",
                FieldValue::MultiSelect(vec!["Email".into(), "Social".into()]),
            ),
            &campaign_specs(),
        )
        .await;
    let campaign_id = match out {
        IntakeOutcome::Saved { campaign_id } => campaign_id,
        other => panic!("expected Saved, got {other:?}"),
    };

    let saved = svc.repo().get_by_id(&campaign_id).await.unwrap().unwrap();
    assert_eq!(saved.user_id, "U42");
    assert_eq!(saved.record.get_text("campaign_name"), Some("Acme Launch"));
    assert_eq!(saved.record.get("budget"), Some(&RecordValue::Integer(1500)));
    assert_eq!(
        saved.record.get("channels"),
        Some(&RecordValue::StringArray(vec!["Email".into(), "Social".into()]))
    );
    // First-colon-only split survived the trip through the store.
    match saved.record.get("kpis") {
        Some(RecordValue::StructuredArray(entries)) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[1].key, "Launch");
            assert_eq!(entries[1].value, "2025-06-01: kickoff");
        }
        other => panic!("expected structured kpis, got {other:?}"),
    }

    let messages = svc.notifier().messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Acme Launch"));
}

#[tokio::test]
async fn missing_required_field_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let svc = sqlite_service(&dir).await;

    let out = svc
        .handle_final(
            "U7",
            None,
            step_with("budget_block", "budget_input", FieldValue::Number(10)),
            &campaign_specs(),
        )
        .await;
    match out {
        IntakeOutcome::Rejected(failure) => {
            assert_eq!(failure.missing, vec!["campaign_name"]);
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    assert!(svc.repo().list_for_user("U7").await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_token_aborts_without_storing() {
    let dir = tempfile::tempdir().unwrap();
    let svc = sqlite_service(&dir).await;

    let garbage = StateToken::from("definitely not a token");
    let out = svc
        .handle_final("U9", Some(&garbage), StepValues::new(), &campaign_specs())
        .await;

    assert!(matches!(out, IntakeOutcome::Aborted(_)));
    assert!(svc.repo().list_for_user("U9").await.unwrap().is_empty());
}

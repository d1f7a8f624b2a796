use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use regimen_cli::commands::{quiz, recommend};
use regimen_core::{
    InMemoryCart, InMemorySnapshotStore, QuizWizard, SnapshotStore, WizardStep,
    WIZARD_SNAPSHOT_KEY,
};
use regimen_store::seed_catalog;

#[test]
fn recommend_ranks_the_seed_catalog_for_muscle_growth() {
    let result = recommend::run("muscle_growth", true, false);

    assert_eq!(result.exit_code, 0);
    let first_line = result.output.lines().next().expect("at least one row");
    assert!(first_line.starts_with("1. CJC-1295"), "unexpected top result: {first_line}");
    assert!(result.output.contains("Ipamorelin"));
}

#[test]
fn recommend_rejects_unknown_goal_ids() {
    let result = recommend::run("muscle_growth,cutting", true, false);

    assert_eq!(result.exit_code, 2);
    assert!(result.output.contains("unknown goal"));
    assert!(result.output.contains("bad_goal"));
}

#[test]
fn recommend_json_output_is_parseable_and_capped() {
    let result = recommend::run("healing,anti_aging", true, true);

    assert_eq!(result.exit_code, 0);
    let rows: serde_json::Value = serde_json::from_str(&result.output).expect("valid JSON");
    let rows = rows.as_array().expect("array of rows");
    assert!(!rows.is_empty());
    assert!(rows.len() <= 3);
    for row in rows {
        assert!(row["score"].as_u64().expect("numeric score") >= 1);
        assert!(row["id"].is_string());
    }
}

#[tokio::test]
async fn scripted_session_runs_the_full_quiz_and_fills_the_cart() {
    let store = Arc::new(InMemorySnapshotStore::default());
    let mut wizard = QuizWizard::new(seed_catalog())
        .with_advance_delay(Duration::ZERO)
        .with_snapshot_store(store.clone());
    let cart = InMemoryCart::default();

    let script = "\
next
muscle_growth
next
age 34
weight 190
next
male
next
beginner
next
agree
next
add cjc-1295
add nothing-real
done
";
    let mut output = Vec::new();
    quiz::run_session(&mut wizard, &cart, Cursor::new(script), &mut output)
        .await
        .expect("session runs");
    let rendered = String::from_utf8(output).expect("utf8 output");

    // The first `next` fires before any goal is chosen and must refuse.
    assert!(rendered.contains("still needed: goals"));
    assert!(rendered.contains("Your Personalized Recommendations"));
    assert!(rendered.contains("CJC-1295"));
    assert!(rendered.contains("Added cjc-1295 to your cart."));
    assert!(rendered.contains("is not among your recommendations"));
    assert!(rendered.contains("Cart: 1 item(s)"));

    assert_eq!(wizard.step(), WizardStep::Results);
    assert_eq!(cart.item_count(), 1);
    // Reaching the results step cleared the stored snapshot.
    assert_eq!(store.get(WIZARD_SNAPSHOT_KEY).expect("get"), None);
}

#[tokio::test]
async fn session_resumes_from_persisted_progress() {
    let store = Arc::new(InMemorySnapshotStore::default());
    store
        .set(
            WIZARD_SNAPSHOT_KEY,
            r#"{"currentStep":3,"answers":{"goals":["healing"],"age":41,"weight":180}}"#,
        )
        .expect("seed snapshot");

    let mut wizard = QuizWizard::new(seed_catalog())
        .with_advance_delay(Duration::ZERO)
        .with_snapshot_store(store);
    let cart = InMemoryCart::default();

    let mut output = Vec::new();
    quiz::run_session(&mut wizard, &cart, Cursor::new("quit\n"), &mut output)
        .await
        .expect("session runs");
    let rendered = String::from_utf8(output).expect("utf8 output");

    assert!(rendered.contains("Step 3 of 6"));
    assert_eq!(wizard.step(), WizardStep::Gender);
    assert_eq!(wizard.answers().age, 41);
}

#[tokio::test]
async fn reset_command_inside_a_session_returns_to_the_first_step() {
    let mut wizard = QuizWizard::new(seed_catalog()).with_advance_delay(Duration::ZERO);
    let cart = InMemoryCart::default();

    let script = "\
healing
next
reset
quit
";
    let mut output = Vec::new();
    quiz::run_session(&mut wizard, &cart, Cursor::new(script), &mut output)
        .await
        .expect("session runs");
    let rendered = String::from_utf8(output).expect("utf8 output");

    assert!(rendered.contains("Progress cleared."));
    assert_eq!(wizard.step(), WizardStep::Goals);
    assert!(wizard.answers().is_default());
}

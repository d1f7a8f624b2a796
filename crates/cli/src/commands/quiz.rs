use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use regimen_core::config::{AppConfig, LoadOptions};
use regimen_core::{
    ExperienceLevel, Gender, Goal, InMemoryCart, ProductId, QuizWizard, SnapshotStore,
    StepOutcome, WizardStep, AGE_RANGE, STEP_COUNT, WEIGHT_RANGE_LBS,
};
use regimen_store::{load_catalog_or_empty, seed_catalog, FileSnapshotStore};

use super::CommandResult;
use crate::telemetry::TracingActivitySink;

pub fn run(fresh: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("quiz", "configuration", error.to_string(), 1)
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "quiz",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            );
        }
    };

    runtime.block_on(async {
        let catalog = if config.catalog.path.exists() {
            load_catalog_or_empty(&config.catalog.path).await
        } else {
            info!(
                event_name = "catalog.seed_fallback",
                path = %config.catalog.path.display(),
                "no catalog file present; using the built-in seed catalog"
            );
            seed_catalog()
        };

        let store: Arc<dyn SnapshotStore> =
            Arc::new(FileSnapshotStore::new(&config.storage.path));
        if fresh {
            if let Err(error) = store.reset_persisted_state() {
                return CommandResult::failure("quiz", "persistence", error.to_string(), 1);
            }
        }

        let mut wizard = QuizWizard::new(catalog)
            .with_advance_delay(Duration::from_millis(config.wizard.advance_delay_ms))
            .with_activity_sink(Arc::new(TracingActivitySink))
            .with_snapshot_store(store);
        let cart = InMemoryCart::default();

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        match run_session(&mut wizard, &cart, stdin.lock(), &mut stdout).await {
            Ok(()) => CommandResult::success(
                "quiz",
                format!(
                    "session ended at step {} with {} cart item(s)",
                    wizard.step().index(),
                    cart.item_count()
                ),
            ),
            Err(error) => CommandResult::failure("quiz", "io", error.to_string(), 1),
        }
    })
}

/// Drive one interactive session over arbitrary input/output streams.
pub async fn run_session<R: BufRead, W: Write>(
    wizard: &mut QuizWizard,
    cart: &InMemoryCart,
    mut input: R,
    output: &mut W,
) -> io::Result<()> {
    render_step(wizard, output)?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed {
            "quit" | "done" => break,
            "back" => {
                wizard.retreat();
                render_step(wizard, output)?;
            }
            "reset" => {
                wizard.reset();
                writeln!(output, "Progress cleared.")?;
                render_step(wizard, output)?;
            }
            "next" => match wizard.advance().await {
                StepOutcome::Advanced { .. } => render_step(wizard, output)?,
                StepOutcome::Blocked { missing, .. } => {
                    writeln!(output, "Cannot continue yet; still needed: {}", missing.join(", "))?;
                }
                StepOutcome::Terminal { .. } => {
                    writeln!(output, "You are on the results step; type 'done' to finish.")?;
                }
            },
            other => {
                if handle_step_input(wizard, cart, other, output)? {
                    render_step(wizard, output)?;
                }
            }
        }
    }

    if !cart.is_empty() {
        writeln!(output, "Cart: {} item(s), subtotal ${}", cart.item_count(), cart.subtotal())?;
    }
    Ok(())
}

/// Interpret step-specific input. Returns whether the step view should be
/// re-rendered.
fn handle_step_input<W: Write>(
    wizard: &mut QuizWizard,
    cart: &InMemoryCart,
    input: &str,
    output: &mut W,
) -> io::Result<bool> {
    match wizard.step() {
        WizardStep::Goals => match input.parse::<Goal>() {
            Ok(goal) => {
                wizard.toggle_goal(goal);
                Ok(true)
            }
            Err(error) => {
                writeln!(output, "{error}")?;
                Ok(false)
            }
        },
        WizardStep::Demographics => {
            let mut parts = input.split_whitespace();
            match (parts.next(), parts.next().and_then(|raw| raw.parse::<u32>().ok())) {
                (Some("age"), Some(age)) if AGE_RANGE.contains(&age) => {
                    wizard.set_age(age);
                    Ok(true)
                }
                (Some("age"), _) => {
                    writeln!(
                        output,
                        "Age must be a whole number between {} and {}.",
                        AGE_RANGE.start(),
                        AGE_RANGE.end()
                    )?;
                    Ok(false)
                }
                (Some("weight"), Some(weight)) if WEIGHT_RANGE_LBS.contains(&weight) => {
                    wizard.set_weight(weight);
                    Ok(true)
                }
                (Some("weight"), _) => {
                    writeln!(
                        output,
                        "Weight must be a whole number between {} and {} lbs.",
                        WEIGHT_RANGE_LBS.start(),
                        WEIGHT_RANGE_LBS.end()
                    )?;
                    Ok(false)
                }
                _ => {
                    writeln!(output, "Set values with: age <years>, weight <lbs>.")?;
                    Ok(false)
                }
            }
        }
        WizardStep::Gender => {
            let choice = Gender::ALL.into_iter().find(|gender| gender.id() == input);
            match choice {
                Some(gender) => {
                    wizard.set_gender(gender);
                    Ok(true)
                }
                None => {
                    writeln!(output, "Choose one of: male, female, other.")?;
                    Ok(false)
                }
            }
        }
        WizardStep::Experience => {
            let choice = ExperienceLevel::ALL.into_iter().find(|level| level.id() == input);
            match choice {
                Some(level) => {
                    wizard.set_injection_experience(level);
                    Ok(true)
                }
                None => {
                    writeln!(output, "Choose one of: none, beginner, intermediate, advanced.")?;
                    Ok(false)
                }
            }
        }
        WizardStep::SafetyAcknowledgment => match input {
            "agree" | "yes" => {
                wizard.acknowledge_side_effects(true);
                Ok(true)
            }
            _ => {
                writeln!(output, "Type 'agree' to acknowledge the safety information.")?;
                Ok(false)
            }
        },
        WizardStep::Results => {
            if let Some(id) = input.strip_prefix("add ") {
                let product_id = ProductId(id.trim().to_string());
                if wizard.add_recommendation_to_cart(&product_id, cart) {
                    writeln!(output, "Added {} to your cart.", product_id.0)?;
                } else {
                    writeln!(output, "`{}` is not among your recommendations.", product_id.0)?;
                }
                Ok(false)
            } else {
                writeln!(output, "Use `add <product-id>` or `done`.")?;
                Ok(false)
            }
        }
    }
}

fn render_step<W: Write>(wizard: &QuizWizard, output: &mut W) -> io::Result<()> {
    let step = wizard.step();
    let answers = wizard.answers();

    writeln!(output)?;
    writeln!(
        output,
        "Step {} of {} - {} ({}% complete)",
        step.index(),
        STEP_COUNT,
        step.title(),
        wizard.progress_percent()
    )?;

    match step {
        WizardStep::Goals => {
            writeln!(output, "Select all that apply; toggle with a goal id, then 'next'.")?;
            for goal in Goal::ALL {
                let marker = if answers.goals.contains(&goal) { "[x]" } else { "[ ]" };
                writeln!(output, "  {marker} {} - {}", goal.id(), goal.label())?;
            }
        }
        WizardStep::Demographics => {
            let age = if answers.age == 0 { "unset".to_string() } else { answers.age.to_string() };
            let weight =
                if answers.weight == 0 { "unset".to_string() } else { answers.weight.to_string() };
            writeln!(output, "  age: {age}  weight: {weight} lbs")?;
            writeln!(output, "Set values with: age <years>, weight <lbs>; then 'next'.")?;
        }
        WizardStep::Gender => {
            for gender in Gender::ALL {
                let marker = if answers.gender == Some(gender) { "[x]" } else { "[ ]" };
                writeln!(output, "  {marker} {} - {}", gender.id(), gender.label())?;
            }
            writeln!(output, "Choose one, then 'next'.")?;
        }
        WizardStep::Experience => {
            for level in ExperienceLevel::ALL {
                let marker =
                    if answers.injection_experience == Some(level) { "[x]" } else { "[ ]" };
                writeln!(output, "  {marker} {} - {}", level.id(), level.label())?;
            }
            writeln!(output, "Choose one, then 'next'.")?;
        }
        WizardStep::SafetyAcknowledgment => {
            writeln!(
                output,
                "Peptide therapies can carry side effects such as injection-site reactions,"
            )?;
            writeln!(
                output,
                "nausea, and hormonal changes. Review dosing with a healthcare professional."
            )?;
            let marker = if answers.acknowledged_side_effects { "[x]" } else { "[ ]" };
            writeln!(output, "  {marker} I understand the potential side effects.")?;
            writeln!(output, "Type 'agree' to acknowledge, then 'next'.")?;
        }
        WizardStep::Results => {
            if wizard.recommendations().is_empty() {
                writeln!(output, "No products matched your goals.")?;
            } else {
                writeln!(output, "Based on your goals and profile:")?;
                for (position, entry) in wizard.recommendations().iter().enumerate() {
                    writeln!(
                        output,
                        "  {}. {} - {} | {} | ${} (score {}) [id: {}]",
                        position + 1,
                        entry.product.name,
                        entry.product.use_case,
                        entry.product.dosage,
                        entry.product.price,
                        entry.score,
                        entry.product.id.0
                    )?;
                }
            }
            writeln!(output, "Use `add <product-id>` to add to cart; 'done' to finish.")?;
        }
    }

    Ok(())
}

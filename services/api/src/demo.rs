use crate::infra::{
    builtin_question_bank, default_screening_config, InMemoryReportSink,
    InMemorySessionRepository,
};
use crate::routes::summarize_bank;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use spectra::config::DEFAULT_PHASE_TWO_CAP;
use spectra::error::AppError;
use spectra::workflows::assessment::{
    Answer, Phase, QuestionBank, ScreeningService, SessionRepository,
};
use spectra::workflows::bank::QuestionBankImporter;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional bank CSV export to screen against instead of the built-in catalog.
    #[arg(long)]
    pub(crate) bank_csv: Option<PathBuf>,
    /// Override the global phase-2 question cap.
    #[arg(long)]
    pub(crate) cap: Option<i32>,
    /// Stop after the phase-2 plan instead of completing the session.
    #[arg(long)]
    pub(crate) skip_phase_two: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BankReportArgs {
    /// Bank CSV export to validate
    #[arg(long)]
    pub(crate) bank_csv: PathBuf,
}

pub(crate) fn run_bank_report(args: BankReportArgs) -> Result<(), AppError> {
    let bank = QuestionBankImporter::from_path(&args.bank_csv)?;
    let summary = summarize_bank(&bank);

    println!("Question bank report: {}", args.bank_csv.display());
    println!(
        "- {} questions ({} phase 1, {} phase 2), option weights {}..={}",
        summary.questions, summary.phase_one, summary.phase_two, summary.weight_min,
        summary.weight_max
    );
    println!("Spectrum coverage:");
    for spectrum in &summary.spectrums {
        println!(
            "  - {}: {} screening item(s), {} deep-dive item(s)",
            spectrum.spectrum, spectrum.phase_one, spectrum.phase_two
        );
    }

    Ok(())
}

/// Deterministic synthetic respondent: options are picked by cycling a fixed
/// index pattern across the phase-1 catalog, which with the built-in bank
/// leaves one spectrum exactly at its threshold and three above it.
fn synthetic_phase_one_answers(bank: &QuestionBank) -> Vec<Answer> {
    const OPTION_CYCLE: [usize; 5] = [3, 2, 0, 3, 1];

    bank.phase_questions(Phase::One)
        .enumerate()
        .map(|(position, question)| {
            let option = &question.options[OPTION_CYCLE[position % OPTION_CYCLE.len()]
                .min(question.options.len() - 1)];
            Answer {
                question_id: question.id.clone(),
                weight: option.weight,
            }
        })
        .collect()
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        bank_csv,
        cap,
        skip_phase_two,
    } = args;

    let bank = match bank_csv {
        Some(path) => QuestionBankImporter::from_path(path)?,
        None => builtin_question_bank(),
    };
    let cap = cap.unwrap_or(DEFAULT_PHASE_TWO_CAP);

    println!("Adaptive screening demo (cap {cap})");

    let repository = Arc::new(InMemorySessionRepository::default());
    let reports = Arc::new(InMemoryReportSink::default());
    let service = Arc::new(ScreeningService::new(
        Arc::new(bank),
        default_screening_config(cap),
        repository.clone(),
        reports.clone(),
    ));

    let record = match service.start() {
        Ok(record) => record,
        Err(err) => {
            println!("  Could not open session: {}", err);
            return Ok(());
        }
    };
    let session_id = record.session_id.clone();
    println!(
        "- Opened session {} at {}",
        session_id,
        record.started_at.with_timezone(&Local).format("%H:%M:%S")
    );

    let answers = synthetic_phase_one_answers(service.bank());
    println!("- Submitting {} phase-1 answers", answers.len());
    let scores = match service.submit_phase_one(&session_id, answers) {
        Ok(scores) => scores,
        Err(err) => {
            println!("  Phase 1 rejected: {}", err);
            return Ok(());
        }
    };

    println!("\nSpectrum scores");
    for (spectrum, score) in &scores {
        println!("- {}: {:.2}", spectrum, score);
    }

    let plan = match service.prepare_phase_two(&session_id) {
        Ok(plan) => plan,
        Err(err) => {
            println!("  Planning unavailable: {}", err);
            return Ok(());
        }
    };

    if plan.allocations.is_empty() {
        println!("\nPhase-2 plan: no spectrum cleared its threshold (or the cap is zero)");
    } else {
        println!(
            "\nPhase-2 plan ({} questions total)",
            plan.total_allocated()
        );
        for allocation in &plan.allocations {
            println!(
                "- {} (score {:.2}): {} question(s)",
                allocation.spectrum,
                plan.scores[&allocation.spectrum],
                allocation.question_ids.len()
            );
        }
    }

    if skip_phase_two {
        return Ok(());
    }

    if let Err(err) = service.begin_phase_two(&session_id) {
        println!("  Phase 2 unavailable: {}", err);
        return Ok(());
    }

    // Answer every allocated deep-dive question with its third option.
    let deep_dive: Vec<Answer> = plan
        .allocations
        .iter()
        .flat_map(|allocation| allocation.question_ids.iter())
        .filter_map(|id| service.bank().get(id))
        .map(|question| {
            let option = &question.options[question.options.len().min(3) - 1];
            Answer {
                question_id: question.id.clone(),
                weight: option.weight,
            }
        })
        .collect();
    if !deep_dive.is_empty() {
        println!("\n- Submitting {} phase-2 answers", deep_dive.len());
        if let Err(err) = service.record_phase_two(&session_id, deep_dive) {
            println!("  Phase 2 rejected: {}", err);
            return Ok(());
        }
    }

    let handoff = match service.finalize(&session_id) {
        Ok(handoff) => handoff,
        Err(err) => {
            println!("  Finalize unavailable: {}", err);
            return Ok(());
        }
    };
    println!(
        "\nSession complete: {} answered question(s) handed off for report generation",
        handoff.answered.len()
    );

    let events = reports.events();
    if events.is_empty() {
        println!("Report sink: no handoff dispatched");
    } else {
        for event in &events {
            println!(
                "Report sink received session {} ({} spectrums scored)",
                event.session_id,
                event.handoff.scores.len()
            );
        }
    }

    if let Ok(Some(stored)) = repository.fetch(&session_id) {
        match serde_json::to_string_pretty(&stored.status_view()) {
            Ok(json) => println!("\nPublic status payload:\n{}", json),
            Err(err) => println!("\nPublic status payload unavailable: {}", err),
        }
    }

    Ok(())
}

use crate::infra::{
    InMemoryApplicationRepository, InMemoryJobPostStore, LoggingNotifier,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use workboard::config::CatalogConfig;
use workboard::error::AppError;
use workboard::marketplace::applications::{
    ApplicationStatus, Availability, JobApplication, JobApplicationService, Reference,
};
use workboard::marketplace::domain::{GateAnswer, PayType, VerificationLevel};
use workboard::marketplace::listing::{
    filter_listings, sort_by_pay, Catalog, FilterCriteria, Listing, PaySort,
};
use workboard::marketplace::posting::{GateRule, JobPostFormData, JobPostService, PostingRules};
use workboard::marketplace::wizard::{Advance, StepErrors, StepWizard, WizardForm};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Require affirmative answers on screening gates instead of any explicit answer
    #[arg(long)]
    pub(crate) affirmative_gates: bool,
    /// Skip the application portion of the demo
    #[arg(long)]
    pub(crate) skip_application: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Search the hire-workers board instead of the find-work board
    #[arg(long)]
    pub(crate) workers: bool,
    /// Free-text query matched against title, description and skills
    #[arg(long, short)]
    pub(crate) query: Option<String>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Comma-separated skills; any match qualifies
    #[arg(long, value_delimiter = ',')]
    pub(crate) skills: Vec<String>,
    /// Comma-separated languages; any match qualifies
    #[arg(long, value_delimiter = ',')]
    pub(crate) languages: Vec<String>,
    #[arg(long)]
    pub(crate) min_rating: Option<f32>,
    /// One of unverified, email_verified, id_verified, background_checked
    #[arg(long, value_parser = parse_verification)]
    pub(crate) min_verification: Option<VerificationLevel>,
    /// Sort matches by pay (pay_asc or pay_desc)
    #[arg(long, value_parser = parse_sort)]
    pub(crate) sort: Option<PaySort>,
    /// CSV file overriding the sample job catalog
    #[arg(long)]
    pub(crate) jobs_csv: Option<PathBuf>,
    /// CSV file overriding the sample worker catalog
    #[arg(long)]
    pub(crate) workers_csv: Option<PathBuf>,
}

fn parse_verification(raw: &str) -> Result<VerificationLevel, String> {
    VerificationLevel::parse(raw).ok_or_else(|| format!("unknown verification level '{raw}'"))
}

fn parse_sort(raw: &str) -> Result<PaySort, String> {
    PaySort::parse(raw).ok_or_else(|| format!("unknown sort order '{raw}'"))
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let catalog = Catalog::load(&CatalogConfig {
        jobs_csv: args.jobs_csv,
        workers_csv: args.workers_csv,
    })?;

    let criteria = FilterCriteria {
        query: args.query,
        category: args.category,
        location: args.location,
        skills: args.skills,
        languages: args.languages,
        min_rating: args.min_rating,
        min_verification: args.min_verification,
        ..FilterCriteria::default()
    };

    if args.workers {
        let mut matches = filter_listings(&catalog.workers, &criteria);
        if let Some(order) = args.sort {
            sort_by_pay(&mut matches, order);
        }
        println!("{} of {} workers match", matches.len(), catalog.workers.len());
        for worker in matches {
            let rate = worker
                .hourly_rate
                .map(|rate| format!("${rate:.2}/hr"))
                .unwrap_or_else(|| "rate on request".to_string());
            println!(
                "- {} | {} | {} | {} | {:.1}★ | {}{}",
                worker.id,
                worker.display_name,
                worker.location,
                rate,
                worker.rating,
                worker.verification.label(),
                if worker.available { "" } else { " | unavailable" }
            );
        }
    } else {
        let mut matches = filter_listings(&catalog.jobs, &criteria);
        if let Some(order) = args.sort {
            sort_by_pay(&mut matches, order);
        }
        println!("{} of {} jobs match", matches.len(), catalog.jobs.len());
        for job in matches {
            println!(
                "- {} | {} | {} | {} | {} | employer {:.1}★",
                job.id,
                job.title,
                job.category,
                job.location,
                describe_pay(job.pay_range(), job.pay_type),
                job.employer_rating
            );
        }
    }

    Ok(())
}

fn describe_pay(range: Option<(f64, f64)>, pay_type: Option<PayType>) -> String {
    let unit = pay_type.map(PayType::label).unwrap_or("");
    match range {
        Some((low, high)) if (low - high).abs() < f64::EPSILON => format!("${low:.2} {unit}"),
        Some((low, high)) => format!("${low:.2}-${high:.2} {unit}"),
        None => "pay not listed".to_string(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let rules = PostingRules {
        gate_rule: if args.affirmative_gates {
            GateRule::Affirmative
        } else {
            GateRule::Answered
        },
    };

    println!("Workboard wizard demo (gate rule: {:?})", rules.gate_rule);
    let job_id = demo_job_post(rules);

    if args.skip_application {
        return Ok(());
    }
    if let Some(job_id) = job_id {
        demo_application(&job_id);
    }

    Ok(())
}

fn demo_job_post(rules: PostingRules) -> Option<String> {
    let service = JobPostService::new(Arc::new(InMemoryJobPostStore::default()), rules);
    let mut wizard = StepWizard::new(JobPostFormData::default(), rules);

    println!("\nJob post wizard");
    print_step(&wizard);
    report_advance(&mut wizard);

    {
        let form = wizard.form_mut();
        form.title = "Roof repair crew lead".to_string();
        form.category = "Construction".to_string();
        form.description = "Short".to_string();
        form.location = "Lincoln, NE".to_string();
        form.pay_type = Some(PayType::Hourly);
        form.pay_min = Some(34.0);
        form.pay_max = Some(28.0);
    }
    println!("- filled basics with a short description and inverted pay range");
    report_advance(&mut wizard);

    {
        let form = wizard.form_mut();
        form.description =
            "Lead a three-person crew on residential shingle and flashing repairs.".to_string();
        form.pay_max = Some(40.0);
    }
    println!("- fixed description and pay range");
    report_advance(&mut wizard);

    {
        let form = wizard.form_mut();
        let first = form.add_skill("Roofing");
        let repeat = form.add_skill("Roofing");
        form.add_skill("Crew leadership");
        form.add_certification("OSHA 30");
        println!("- added skills (duplicate insert accepted: {})", first && repeat);
    }
    report_advance(&mut wizard);

    {
        let form = wizard.form_mut();
        form.add_language("English");
        form.set_no_language_requirement(true);
        println!(
            "- language policy after choosing \"no requirement\": {:?}",
            form.language_policy()
        );
        form.requires_background_check = Some(GateAnswer::Required);
        form.requires_intro_video = Some(GateAnswer::NotRequired);
    }
    report_advance(&mut wizard);

    wizard.form_mut().requires_references = Some(GateAnswer::Required);
    println!("- answered the references gate");
    report_advance(&mut wizard);

    let draft = wizard.save_draft();
    println!("- draft snapshot holds {} skills", draft.required_skills.len());

    let form = match wizard.begin_submit() {
        Ok(form) => form,
        Err(err) => {
            println!("- cannot publish: {err}");
            return None;
        }
    };
    let result = service.publish("employer-demo", form);
    if let Err(err) = wizard.finish_submit(&result) {
        println!("- wizard state error: {err}");
    }

    match result {
        Ok(post) => {
            println!(
                "- published {} ({}) with status {}",
                post.id,
                post.form.title,
                post.status.label()
            );
            Some(post.id.0)
        }
        Err(err) => {
            println!("- publish failed: {err}");
            None
        }
    }
}

fn demo_application(job_id: &str) {
    let notifier = Arc::new(LoggingNotifier::default());
    let service = JobApplicationService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        notifier.clone(),
    );

    println!("\nApplication wizard for {job_id}");
    let incomplete = JobApplication::new(job_id, "worker-demo");
    match service.submit(incomplete) {
        Ok(record) => println!("- unexpected submit of {}", record.id),
        Err(err) => println!("- submitting an empty application: {err}"),
    }

    let mut wizard = StepWizard::new(JobApplication::new(job_id, "worker-demo"), ());
    print_step(&wizard);
    wizard.form_mut().introduction =
        "Twelve years on residential roofs, four as a crew lead.".to_string();
    report_advance(&mut wizard);

    wizard.form_mut().add_reference(Reference {
        name: "Priya Natarajan".to_string(),
        company: "Natarajan Homes".to_string(),
        email: "priya-at-example".to_string(),
        ..Reference::default()
    });
    println!("- added a reference with a malformed email");
    report_advance(&mut wizard);

    let fixed = Reference {
        name: "Priya Natarajan".to_string(),
        company: "Natarajan Homes".to_string(),
        email: "priya@natarajan.example".to_string(),
        ..Reference::default()
    };
    let stale: Vec<_> = wizard
        .form()
        .references
        .entries()
        .iter()
        .map(|entry| entry.id)
        .collect();
    for id in stale {
        wizard.form_mut().remove_reference(id);
    }
    wizard.form_mut().add_reference(fixed);
    println!("- replaced the reference");
    report_advance(&mut wizard);

    wizard.form_mut().availability = Availability {
        start_date: "2026-11-02".to_string(),
        days_per_week: Some(5),
        hours_per_day: Some(9),
    };
    report_advance(&mut wizard);

    wizard.form_mut().confirm_skill("Roofing");
    report_advance(&mut wizard);

    let application = match wizard.begin_submit() {
        Ok(application) => application,
        Err(err) => {
            println!("- cannot submit: {err}");
            return;
        }
    };
    let result = service.submit(application);
    if let Err(err) = wizard.finish_submit(&result) {
        println!("- wizard state error: {err}");
    }

    let record = match result {
        Ok(record) => record,
        Err(err) => {
            println!("- submit failed: {err}");
            return;
        }
    };
    println!("- submitted {} as {}", record.id, record.status().label());

    for next in [ApplicationStatus::UnderReview, ApplicationStatus::Accepted] {
        match service.transition(&record.id, next) {
            Ok(updated) => println!("- moved to {}", updated.status().label()),
            Err(err) => println!("- transition failed: {err}"),
        }
    }
    if let Err(err) = service.transition(&record.id, ApplicationStatus::Rejected) {
        println!("- late rejection refused: {err}");
    }

    let events = notifier.events();
    println!("- {} notifications queued:", events.len());
    for event in events {
        println!("  - {} -> {}", event.template, event.recipient);
    }
}

fn print_step<F: WizardForm>(wizard: &StepWizard<F>) {
    println!(
        "- step {}/{}: {}",
        wizard.step(),
        wizard.steps(),
        wizard.step_title()
    );
}

fn report_advance<F: WizardForm>(wizard: &mut StepWizard<F>) {
    match wizard.advance() {
        Advance::Moved { .. } => print_step(wizard),
        Advance::Blocked { errors } => print_errors(wizard.step(), &errors),
        Advance::AtFinalStep => println!("- final step reached; ready to submit"),
    }
}

fn print_errors(step: u8, errors: &StepErrors) {
    println!("- step {step} blocked by {} error(s):", errors.len());
    for (field, message) in errors.iter() {
        println!("    {field}: {message}");
    }
}

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Args;

use folio_rank::config::AppConfig;
use folio_rank::error::AppError;
use folio_rank::portfolio::{
    OrganizationId, PortfolioRepository, PortfolioService, ProjectId, RecomputeRunner,
    RecomputeSummary,
};
use folio_rank::scoring::ScoreOptions;
use folio_rank::telemetry;

use crate::infra::{seed_demo_portfolio, InMemoryPortfolioRepository};

#[derive(Args, Debug, Default)]
pub(crate) struct RecomputeArgs {
    /// Use the committee 1..5 output range instead of the configured defaults
    #[arg(long)]
    pub(crate) committee: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print every project and its stored score after the recompute pass
    #[arg(long)]
    pub(crate) list_projects: bool,
}

/// Administrative recompute over the demo-seeded store. With a relational
/// collaborator wired in, the same runner walks the real portfolio.
pub(crate) fn run_recompute(args: RecomputeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let repository = Arc::new(InMemoryPortfolioRepository::default());
    seed_demo_portfolio(&repository);

    let options = if args.committee {
        ScoreOptions::committee()
    } else {
        config.scoring.options()
    };

    let runner = RecomputeRunner::new(repository.clone(), options);
    let summary = runner.run(&AtomicBool::new(false))?;

    render_summary(&summary);
    render_portfolio(repository.as_ref());

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let repository = Arc::new(InMemoryPortfolioRepository::default());
    seed_demo_portfolio(&repository);

    let options = config.scoring.options();
    let service = PortfolioService::new(repository.clone(), options);
    let organization = OrganizationId("acme-media".to_string());

    println!("Portfolio scoring demo");

    // A project manager adjusting their self-assessment sees this number
    // live, before anything is stored.
    let form: BTreeMap<String, f64> = [
        ("revenue_impact".to_string(), 8.0),
        ("strategic_fit".to_string(), 7.0),
        ("delivery_risk".to_string(), 2.0),
        ("implementation_cost".to_string(), 4.0),
    ]
    .into();
    let preview = service
        .preview(&organization, &form, None)
        .map_err(service_error)?;
    println!(
        "\nLive preview for a Checkout Revamp self-assessment: {:.2}",
        preview.score
    );

    let project = ProjectId("P-1001".to_string());
    let view = service
        .rescore(&organization, &project)
        .map_err(service_error)?;
    println!(
        "Persisted score after rescoring {}: {:.2}",
        view.name,
        view.score.unwrap_or_default()
    );

    let runner = RecomputeRunner::new(repository.clone(), options);
    let summary = runner.run(&AtomicBool::new(false))?;
    println!();
    render_summary(&summary);

    if args.list_projects {
        render_portfolio(repository.as_ref());
    }

    Ok(())
}

fn render_summary(summary: &RecomputeSummary) {
    println!("Recompute summary");
    println!("- organizations processed: {}", summary.organizations);
    println!("- projects scored: {}", summary.scored);
    println!("- projects skipped (no ratings): {}", summary.skipped);
    println!("- failures: {}", summary.failed);
}

fn render_portfolio(repository: &InMemoryPortfolioRepository) {
    println!("\nStored portfolio scores");
    let organizations = repository.organizations().unwrap_or_default();
    for organization in organizations {
        println!("- {organization}");
        let projects = repository.projects(&organization).unwrap_or_default();
        if projects.is_empty() {
            println!("  (no projects)");
            continue;
        }
        for project in projects {
            match project.score {
                Some(score) => println!("  {} | {} | {score:.2}", project.id, project.name),
                None => println!("  {} | {} | not scored", project.id, project.name),
            }
        }
    }
}

fn service_error(error: folio_rank::portfolio::PortfolioServiceError) -> AppError {
    use folio_rank::portfolio::PortfolioServiceError;

    match error {
        PortfolioServiceError::Scoring(err) => AppError::Scoring(err),
        PortfolioServiceError::Repository(err) => AppError::Repository(err),
        other => AppError::Io(std::io::Error::other(other.to_string())),
    }
}

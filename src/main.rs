use csv2mq::adapters::{AmqpBroker, AutoConfirm, ConsoleOperator, DryRunBroker};
use csv2mq::app::generators::BuiltinGenerator;
use csv2mq::domain::model::{RunReport, Termination};
use csv2mq::utils::error::{ErrorSeverity, FeedError};
use csv2mq::utils::logger::{self, LogFormat};
use csv2mq::utils::validation::Validate;
use csv2mq::{CliConfig, PublishConfig, PublishEngine};

#[tokio::main]
async fn main() {
    let args = CliConfig::parse_normalized();

    logger::init_logger(args.verbose, LogFormat::from_flag(args.log_json));

    tracing::info!("🚀 Starting csv2mq");
    tracing::debug!("CLI config: {:?}", args);

    match run(&args).await {
        Ok(report) => {
            print_summary(&report);
            if report.termination == Termination::Declined {
                std::process::exit(4);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Publishing failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(args: &CliConfig) -> Result<RunReport, FeedError> {
    tracing::info!("📁 Loading configuration from: {}", args.cfg);
    let config = PublishConfig::from_file(&args.cfg)?;
    config.validate()?;
    csv2mq::utils::validation::validate_path("src", &args.src)?;

    let generator = BuiltinGenerator::from_config(&config);
    let engine = PublishEngine::new(config, &args.src, generator)?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing is sent to the broker");
        return engine.run(DryRunBroker::new(), AutoConfirm).await;
    }

    let broker = AmqpBroker::connect(engine.config()).await?;
    engine.run(broker, ConsoleOperator::new()).await
}

fn print_summary(report: &RunReport) {
    match report.termination {
        Termination::Completed => println!("✅ Publishing completed"),
        Termination::Declined => println!("⛔ Publishing cancelled by operator"),
    }
    println!("  Records read: {}", report.records_read);
    println!("  Accepted: {}", report.accepted);
    println!("  Skipped (comment): {}", report.skipped_comments);
    println!("  Skipped (transform error): {}", report.skipped_transform);
    println!(
        "  Published: {} (acked {}, nacked {})",
        report.published, report.acked, report.nacked
    );
    println!("  Elapsed: {}ms", report.elapsed().num_milliseconds());
}

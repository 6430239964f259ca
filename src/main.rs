use sbom_scanner::adapters::outbound::console::StderrProgressReporter;
use sbom_scanner::adapters::outbound::network::{GithubClient, JenkinsClient, VeracodeClient};
use sbom_scanner::application::factories::{
    PresenterFactory, PresenterType, ScannerDependencies, ScannerFactory,
};
use sbom_scanner::application::scanners::ScannerKind;
use sbom_scanner::application::use_cases::RunScanUseCase;
use sbom_scanner::cli::Args;
use sbom_scanner::config::{self, Settings};
use sbom_scanner::logging;
use sbom_scanner::ports::outbound::{CiServerClient, SecurityPlatformClient, SourceControlClient};
use sbom_scanner::shared::error::ExitCode;
use sbom_scanner::shared::Result;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Parse command-line arguments; clap exits with code 2 on invalid input
    let args = Args::parse_args();

    if let Err(e) = logging::init_tracing(args.log_format, args.verbose) {
        eprintln!("⚠️  {}", e);
    }

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::from_error(&e).as_i32());
    }
}

async fn run(args: Args) -> Result<()> {
    // Load the config file, explicit or discovered
    let file = match &args.config {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(&std::env::current_dir()?)?,
    };
    let settings = Settings::resolve(&args, file)?;
    let request = settings.scan_request();

    // Create adapters (Dependency Injection)
    let source_control: Arc<dyn SourceControlClient> = Arc::new(GithubClient::new(
        &settings.github.api_url,
        &settings.github.raw_url,
        settings.github.token.clone(),
        &settings.http,
    )?);
    let dependencies = ScannerDependencies {
        source_control: Arc::clone(&source_control),
        ci_server: create_ci_server(&settings)?,
        security_platform: create_security_platform(&settings)?,
    };

    // Create use case with injected dependencies
    let use_case = RunScanUseCase::new(
        source_control,
        ScannerFactory::new(dependencies, settings.scanner_settings.clone()),
        StderrProgressReporter::new(),
    );

    // Execute use case
    let report = use_case.execute(request).await?;

    // Present output
    let presenter = PresenterFactory::create(PresenterType::from_output(&settings.output));
    presenter.present(&report)?;

    Ok(())
}

/// `None` unless the CI scanner is enabled and its credentials are set.
fn create_ci_server(settings: &Settings) -> Result<Option<Arc<dyn CiServerClient>>> {
    if !settings.scanners.contains(&ScannerKind::CiBuild) {
        return Ok(None);
    }
    let Some(credentials) = &settings.jenkins else {
        return Ok(None);
    };
    let client = JenkinsClient::new(
        credentials.user.clone(),
        credentials.token.clone(),
        &settings.http,
    )?;
    Ok(Some(Arc::new(client)))
}

fn create_security_platform(
    settings: &Settings,
) -> Result<Option<Arc<dyn SecurityPlatformClient>>> {
    let needed = settings
        .scanners
        .iter()
        .any(|kind| matches!(kind, ScannerKind::StaticAnalysis | ScannerKind::Composition));
    if !needed {
        return Ok(None);
    }
    let Some(veracode) = &settings.veracode else {
        return Ok(None);
    };
    let client = VeracodeClient::new(
        &veracode.api_id,
        &veracode.api_key,
        &veracode.api_host,
        &veracode.sca_ui_host,
        &settings.http,
    )?;
    Ok(Some(Arc::new(client)))
}

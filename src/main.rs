//! Pipeline Smoke CLI
//!
//! Runs smoke case files against real infrastructure.

use std::path::PathBuf;

use pipeline_smoke::{settings, SmokeCase, SmokeHarness, TerraformCli, Validate};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let parallel = args.iter().skip(1).any(|a| a == "--parallel");
    let paths: Vec<PathBuf> = args
        .iter()
        .skip(1)
        .filter(|a| a.as_str() != "--parallel")
        .map(PathBuf::from)
        .collect();

    if paths.is_empty() {
        eprintln!("Usage: {} [--parallel] <case.yaml|case.toml>...", args[0]);
        eprintln!("\nApplies each case, checks its output, then destroys it.");
        eprintln!("Cases run one at a time unless --parallel is given.");
        eprintln!("\nEnvironment variables:");
        eprintln!("  SMOKE_TERRAFORM_BIN  Terraform binary (default: terraform)");
        eprintln!("  SMOKE_TERRAFORM_DIR  Override the directory of every case");
        eprintln!("  SMOKE_DEBUG=1        Log terraform stdout at info level");
        std::process::exit(1);
    }

    let settings = settings();

    let mut cases = Vec::new();
    for path in paths {
        let mut case = match SmokeCase::load(&path) {
            Ok(case) => case,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        };
        settings.apply_to(&mut case);

        match case.validate().into_result() {
            Ok(warnings) => {
                for warning in warnings {
                    tracing::warn!(case = %case.name, "{}", warning);
                }
            }
            Err(e) => {
                eprintln!("Invalid case {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }

        cases.push(case);
    }

    let engine = match &settings.terraform_bin {
        Some(bin) => TerraformCli::with_binary(bin),
        None => TerraformCli::new(),
    };
    let harness = SmokeHarness::new(engine);

    let results = if parallel {
        harness.run_all(cases).await
    } else {
        cases.iter().map(|case| harness.run(case)).collect::<Vec<_>>()
    };

    let mut failed = 0;
    for result in &results {
        println!("\n{}", "=".repeat(60));
        println!("{}", result);
        if !result.passed {
            failed += 1;
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("{} passed, {} failed", results.len() - failed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

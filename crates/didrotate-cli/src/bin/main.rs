//! DID rotation CLI binary
use anyhow::bail;
use clap::{arg, Arg, ArgAction, Command};
use didrotate_api::{
    api::{DIDRotationDocumentAPI, DIDRotationVCAPI, DIDRotationVPAPI},
    DIDRotationAPI,
};
use didrotate_cli::{config::cli_config, ensure_parent_dir, status_str};
use didrotate_core::{provider::ProofOptions, utils::SystemClock, vp::verification_result};
use didrotate_ssi::SSIProvider;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter, FmtSubscriber};

fn cli() -> Command {
    Command::new("didrotate")
        .about(format!(
            "didrotate v{}\n\nIssues and verifies cross-signed DID rotation credentials.",
            env!("CARGO_PKG_VERSION")
        ))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("issue_vcs")
                .about("Issues a pair of rotation credentials, each DID vouching for the other.")
                .arg(arg!(<DID1> "First DID"))
                .arg(arg!(<KEYFILE1> "Signing key file of the first DID"))
                .arg(arg!(<DID2> "Second DID"))
                .arg(arg!(<KEYFILE2> "Signing key file of the second DID"))
                .arg(arg!(-o --output_dir <DIR> "Directory to write credentials to").required(false)),
        )
        .subcommand(
            Command::new("issue_presentation")
                .about("Bundles two rotation credentials into a presentation signed by the holder.")
                .arg(arg!(<HOLDER> "Holder DID"))
                .arg(arg!(<KEYFILE> "Signing key file of the holder"))
                .arg(arg!(<CREDENTIAL1> "First credential file"))
                .arg(arg!(<CREDENTIAL2> "Second credential file"))
                .arg(arg!(-o --output <FILE> "File to write the presentation to").required(false)),
        )
        .subcommand(
            Command::new("verify_presentation")
                .about("Verifies one or more rotation presentations.")
                .arg(
                    Arg::new("PRESENTATION")
                        .help("Presentation files")
                        .required(true)
                        .num_args(1..),
                )
                .arg(arg!(-v --verbose).action(ArgAction::SetTrue)),
        )
}

fn proof_options() -> ProofOptions {
    ProofOptions {
        proof_format: cli_config().proof_format.clone(),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish()
        .try_init()?;

    let matches = cli().get_matches();
    let provider = SSIProvider::default();
    match matches.subcommand() {
        Some(("issue_vcs", sub_matches)) => {
            let first = DIDRotationAPI::load_attestor(
                sub_matches.get_one::<String>("DID1").unwrap(),
                Path::new(sub_matches.get_one::<String>("KEYFILE1").unwrap()),
            )?;
            let second = DIDRotationAPI::load_attestor(
                sub_matches.get_one::<String>("DID2").unwrap(),
                Path::new(sub_matches.get_one::<String>("KEYFILE2").unwrap()),
            )?;
            let output_dir = sub_matches
                .get_one::<String>("output_dir")
                .map(PathBuf::from)
                .unwrap_or_else(|| cli_config().output_dir.clone());
            std::fs::create_dir_all(&output_dir)?;

            let credentials = DIDRotationAPI::issue_vcs(
                &first,
                &second,
                &proof_options(),
                &provider,
                &SystemClock,
            )
            .await?;
            for (credential, file_name) in credentials
                .iter()
                .zip(cli_config().credential_file_names.iter())
            {
                let path = output_dir.join(file_name);
                DIDRotationAPI::write_document(&path, credential)?;
                println!("{}", path.display());
            }
        }
        Some(("issue_presentation", sub_matches)) => {
            let holder = DIDRotationAPI::load_attestor(
                sub_matches.get_one::<String>("HOLDER").unwrap(),
                Path::new(sub_matches.get_one::<String>("KEYFILE").unwrap()),
            )?;
            let credential_a = DIDRotationAPI::read_document(Path::new(
                sub_matches.get_one::<String>("CREDENTIAL1").unwrap(),
            ))?;
            let credential_b = DIDRotationAPI::read_document(Path::new(
                sub_matches.get_one::<String>("CREDENTIAL2").unwrap(),
            ))?;
            let path = sub_matches
                .get_one::<String>("output")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    cli_config()
                        .output_dir
                        .join(&cli_config().presentation_file_name)
                });

            let presentation = DIDRotationAPI::issue_presentation(
                &holder,
                &credential_a,
                &credential_b,
                &proof_options(),
                &provider,
            )
            .await?;
            ensure_parent_dir(&path)?;
            DIDRotationAPI::write_document(&path, &presentation)?;
            println!("{}", path.display());
        }
        Some(("verify_presentation", sub_matches)) => {
            let verbose = matches!(sub_matches.get_one::<bool>("verbose"), Some(true));
            let paths: Vec<&String> = sub_matches
                .get_many::<String>("PRESENTATION")
                .unwrap()
                .collect();
            let presentations = paths
                .iter()
                .map(|path| DIDRotationAPI::read_document(Path::new(path)))
                .collect::<Result<Vec<_>, _>>()?;

            let outcomes = DIDRotationAPI::verify_presentations(
                &presentations,
                cli_config().verify_concurrency,
                &provider,
            )
            .await;
            let mut rejected = 0;
            for (path, outcome) in paths.iter().zip(outcomes.iter()) {
                let kind = outcome.as_ref().err().map(|err| err.kind().to_string());
                println!(
                    "{}",
                    status_str(format!("{}... ", path), outcome.is_ok(), kind.as_deref())
                );
                if verbose || outcome.is_err() {
                    println!("{}", to_string_pretty(&verification_result(outcome))?);
                }
                if outcome.is_err() {
                    rejected += 1;
                }
            }
            if rejected > 0 {
                bail!("{} of {} presentations rejected", rejected, outcomes.len());
            }
            tracing::info!("All {} presentations verified.", outcomes.len());
        }
        _ => bail!("Unrecognised subcommand."),
    }
    Ok(())
}

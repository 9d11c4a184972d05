//! jarsigner-command CLI
//!
//! Signs and verifies Java archives through the JDK jarsigner tool

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jarsigner_command::logging::setup_logging;
use jarsigner_command::{
    CommandLineBuilder, ConfigLoadOptions, ConfigLoader, JarSignerConfig, JarSignerExecutor,
    JarSignerRequest,
};
use log::LevelFilter;
use secrecy::SecretString;
use std::io::Write;
use std::path::PathBuf;
use std::process;

/// Signs and verifies Java archives through jarsigner
#[derive(Parser)]
#[command(name = "jarsigner-command")]
#[command(version)]
#[command(about = "Signs and verifies Java archives through jarsigner", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./.jarsigner.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path of the jarsigner executable
    #[arg(long, global = true, value_name = "PATH")]
    jarsigner: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    /// Print the masked command line instead of running it
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign an archive
    Sign {
        #[command(flatten)]
        common: CommonArgs,

        /// Private key password
        #[arg(long, env = "JARSIGNER_KEYPASS", hide_env_values = true)]
        keypass: Option<String>,

        /// Base name of the signature files
        #[arg(long)]
        sigfile: Option<String>,

        /// Time Stamping Authority URL
        #[arg(long)]
        tsa: Option<String>,

        /// Keystore alias of the TSA certificate
        #[arg(long)]
        tsacert: Option<String>,

        /// TSA policy OID
        #[arg(long)]
        tsapolicyid: Option<String>,

        /// TSA message digest algorithm
        #[arg(long)]
        tsadigestalg: Option<String>,

        /// Write the signed archive to this path
        #[arg(long)]
        signedjar: Option<PathBuf>,

        /// Certificate chain file
        #[arg(long)]
        certchain: Option<PathBuf>,
    },

    /// Verify an archive
    Verify {
        #[command(flatten)]
        common: CommonArgs,

        /// Show certificate details
        #[arg(long)]
        certs: bool,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Archive to sign or verify
    #[arg(value_name = "ARCHIVE")]
    archive: PathBuf,

    /// Keystore alias
    #[arg(value_name = "ALIAS")]
    alias: Option<String>,

    /// Keystore location
    #[arg(long)]
    keystore: Option<String>,

    /// Keystore password
    #[arg(long, env = "JARSIGNER_STOREPASS", hide_env_values = true)]
    storepass: Option<String>,

    /// Keystore type
    #[arg(long)]
    storetype: Option<String>,

    /// Provider name
    #[arg(long)]
    provider_name: Option<String>,

    /// Provider class
    #[arg(long)]
    provider_class: Option<String>,

    /// Provider argument
    #[arg(long)]
    provider_arg: Option<String>,

    /// Verbose jarsigner output
    #[arg(short, long)]
    verbose: bool,

    /// Enter the keystore password through a protected path
    #[arg(long)]
    protected: bool,

    /// Maximum heap of the jarsigner JVM (e.g. 512m)
    #[arg(long)]
    max_memory: Option<String>,

    /// Working directory of jarsigner
    #[arg(long)]
    working_dir: Option<PathBuf>,

    /// Extra argument passed to jarsigner verbatim (repeatable)
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let result = run();

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    setup_logging(cli.log_level)?;

    let config = ConfigLoader::load(ConfigLoadOptions {
        project_path: PathBuf::from("."),
        config_file: cli.config,
        cli_args: Some(JarSignerConfig {
            executable: cli.jarsigner,
            ..Default::default()
        }),
        env: std::env::vars().collect(),
    })
    .context("Failed to load configuration")?;

    let request = match cli.command {
        Commands::Sign {
            common,
            keypass,
            sigfile,
            tsa,
            tsacert,
            tsapolicyid,
            tsadigestalg,
            signedjar,
            certchain,
        } => {
            let tsa = tsa.or_else(|| config.tsa.clone());
            common_request(JarSignerRequest::sign(&common.archive), common, &config)
                .with_sign_options(|options| {
                    options.keypass = keypass.map(SecretString::from);
                    options.sigfile = sigfile;
                    options.tsa_location = tsa;
                    options.tsa_alias = tsacert;
                    options.tsa_policy_id = tsapolicyid;
                    options.tsa_digest_alg = tsadigestalg;
                    options.signedjar = signedjar;
                    options.certchain = certchain;
                })
        }
        Commands::Verify { common, certs } => {
            common_request(JarSignerRequest::verify(&common.archive), common, &config)
                .with_verify_options(|options| options.certs = certs)
        }
    };

    let mut builder = CommandLineBuilder::new();
    builder.set_executable(config.resolve_executable());
    let command_line = builder.build(&request)?;

    if cli.dry_run {
        println!("{}", command_line);
        return Ok(0);
    }

    let output = JarSignerExecutor::new().execute(&command_line)?;
    std::io::stdout().write_all(output.stdout.as_bytes())?;
    std::io::stderr().write_all(output.stderr.as_bytes())?;

    if !output.success() {
        log::error!("jarsigner {} failed: {}", request.mode(), output.command_line);
    }
    Ok(output.exit_code.unwrap_or(1))
}

/// Fills the options shared by sign and verify, falling back to configured defaults
fn common_request(
    request: JarSignerRequest,
    common: CommonArgs,
    config: &JarSignerConfig,
) -> JarSignerRequest {
    JarSignerRequest {
        alias: common.alias.or_else(|| config.alias.clone()),
        keystore: common.keystore.or_else(|| config.keystore.clone()),
        storepass: common.storepass.map(SecretString::from),
        storetype: common.storetype.or_else(|| config.storetype.clone()),
        provider_name: common.provider_name,
        provider_class: common.provider_class,
        provider_arg: common.provider_arg,
        verbose: common.verbose || config.verbose.unwrap_or(false),
        protected_authentication_path: common.protected,
        max_memory: common.max_memory.or_else(|| config.max_memory.clone()),
        arguments: common.args,
        working_directory: common.working_dir,
        ..request
    }
}

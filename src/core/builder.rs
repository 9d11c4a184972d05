//! Translates a [`JarSignerRequest`] into a [`CommandLine`]
//!
//! Arguments are emitted in the order jarsigner expects: common options, extra
//! arguments, sign or verify options, then the archive and the optional alias.

use super::command_line::CommandLine;
use super::error::JarSignerError;
use super::request::{JarSignerRequest, RequestKind, SignOptions, VerifyOptions};
use log::{Level, Log, Record};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Builds jarsigner command lines from requests
///
/// # Example
///
/// ```
/// use jarsigner_command::{CommandLineBuilder, JarSignerRequest};
///
/// let mut builder = CommandLineBuilder::new();
/// builder.set_executable("jarsigner");
///
/// let request = JarSignerRequest::sign("app.jar")
///     .with_keystore("ks.jks")
///     .with_storepass("secret");
/// let cli = builder.build(&request).unwrap();
/// assert_eq!(cli.to_string(), "jarsigner -keystore ks.jks -storepass ***** app.jar");
/// ```
pub struct CommandLineBuilder {
    executable: Option<PathBuf>,
    logger: Option<&'static dyn Log>,
}

impl fmt::Debug for CommandLineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLineBuilder")
            .field("executable", &self.executable)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl Default for CommandLineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLineBuilder {
    /// Creates a builder logging through the global `log` logger, without an executable
    pub fn new() -> Self {
        Self {
            executable: None,
            logger: Some(log::logger()),
        }
    }

    /// Sets the jarsigner executable placed in front of every command line
    pub fn set_executable(&mut self, executable: impl Into<PathBuf>) {
        self.executable = Some(executable.into());
    }

    /// Replaces the logger; `None` makes [`build`](Self::build) fail
    pub fn set_logger(&mut self, logger: Option<&'static dyn Log>) {
        self.logger = logger;
    }

    fn check_required_state(&self) -> Result<(&Path, &'static dyn Log), JarSignerError> {
        let logger = self.logger.ok_or_else(|| {
            JarSignerError::Configuration("A logger instance is required.".to_string())
        })?;
        let executable = self.executable.as_deref().ok_or_else(|| {
            JarSignerError::Configuration("A jarsigner executable is required.".to_string())
        })?;
        Ok((executable, logger))
    }

    /// Builds the command line for `request`
    ///
    /// # Errors
    ///
    /// Returns `JarSignerError::Configuration` if no executable or no logger is set.
    /// Request values are not validated; jarsigner reports bad values itself.
    pub fn build(&self, request: &JarSignerRequest) -> Result<CommandLine, JarSignerError> {
        let (executable, logger) = self.check_required_state()?;

        let mut cli = CommandLine::new(executable);
        cli.set_working_directory(request.working_directory.clone());

        if request.verbose {
            cli.push("-verbose");
        }

        push_option(&mut cli, "-keystore", request.keystore.as_deref());
        push_secret(&mut cli, "-storepass", request.storepass.as_ref());
        push_option(&mut cli, "-storetype", request.storetype.as_deref());
        push_option(&mut cli, "-providerName", request.provider_name.as_deref());
        push_option(&mut cli, "-providerClass", request.provider_class.as_deref());
        push_option(&mut cli, "-providerArg", request.provider_arg.as_deref());

        if request.protected_authentication_path {
            cli.push("-protected");
        }

        if let Some(max_memory) = non_empty(request.max_memory.as_deref()) {
            cli.push(format!("-J-Xmx{}", max_memory));
        }

        cli.extend(request.arguments.iter().cloned());

        match &request.kind {
            RequestKind::Sign(options) => build_sign(&mut cli, options),
            RequestKind::Verify(options) => build_verify(&mut cli, options),
        }

        cli.push_path(&request.archive);

        if let Some(alias) = non_empty(request.alias.as_deref()) {
            cli.push(alias);
        }

        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target(module_path!())
                .args(format_args!("jarsigner {} command line: {}", request.mode(), cli))
                .build(),
        );

        Ok(cli)
    }
}

fn build_sign(cli: &mut CommandLine, options: &SignOptions) {
    push_secret(cli, "-keypass", options.keypass.as_ref());
    push_option(cli, "-sigfile", options.sigfile.as_deref());

    push_option(cli, "-tsa", non_blank(options.tsa_location.as_deref()));
    push_option(cli, "-tsacert", non_blank(options.tsa_alias.as_deref()));
    push_option(cli, "-tsapolicyid", non_blank(options.tsa_policy_id.as_deref()));
    push_option(cli, "-tsadigestalg", non_blank(options.tsa_digest_alg.as_deref()));

    if let Some(signedjar) = &options.signedjar {
        cli.push("-signedjar");
        cli.push_path(absolute(signedjar));
    }

    if let Some(certchain) = &options.certchain {
        cli.push("-certchain");
        cli.push_path(absolute(certchain));
    }
}

fn build_verify(cli: &mut CommandLine, options: &VerifyOptions) {
    cli.push_front("-verify");

    if options.certs {
        cli.push("-certs");
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Whitespace as understood by `java.lang.Character.isWhitespace`
fn is_java_whitespace(c: char) -> bool {
    matches!(c, '\t'..='\r' | '\u{1C}'..='\u{1F}')
        || (c.is_whitespace() && !matches!(c, '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}'))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.chars().all(is_java_whitespace))
}

fn push_option(cli: &mut CommandLine, flag: &str, value: Option<&str>) {
    if let Some(value) = non_empty(value) {
        cli.push(flag);
        cli.push(value);
    }
}

fn push_secret(cli: &mut CommandLine, flag: &str, value: Option<&SecretString>) {
    if let Some(secret) = value.filter(|s| !s.expose_secret().is_empty()) {
        cli.push(flag);
        cli.push_masked(secret.clone());
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command_line::{Arg, MASK};
    use log::Metadata;
    use std::ffi::OsStr;
    use std::sync::Mutex;

    struct CaptureLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.lines.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        lines: Mutex::new(Vec::new()),
    };

    fn builder() -> CommandLineBuilder {
        let mut builder = CommandLineBuilder::new();
        builder.set_executable("jarsigner");
        builder
    }

    fn exposed(cli: &CommandLine) -> Vec<&OsStr> {
        cli.args().iter().map(Arg::expose).collect()
    }

    fn position(cli: &CommandLine, token: &str) -> usize {
        cli.args().iter().position(|a| a.expose() == token).unwrap()
    }

    #[test]
    fn test_archive_only() {
        let cli = builder().build(&JarSignerRequest::sign("a.jar")).unwrap();

        assert_eq!(cli.executable(), Path::new("jarsigner"));
        assert_eq!(exposed(&cli), vec!["a.jar"]);
        assert_eq!(cli.to_string(), "jarsigner a.jar");
    }

    #[test]
    fn test_keystore_and_storepass() {
        let request = JarSignerRequest::sign("a.jar")
            .with_keystore("ks.jks")
            .with_storepass("secret");

        let cli = builder().build(&request).unwrap();

        assert_eq!(exposed(&cli), vec!["-keystore", "ks.jks", "-storepass", "secret", "a.jar"]);
        assert!(cli.args()[3].is_masked());
        assert_eq!(cli.masked_args()[3], MASK);
        assert_eq!(cli.to_string(), "jarsigner -keystore ks.jks -storepass ***** a.jar");
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let request = JarSignerRequest::sign("a.jar")
            .with_keystore("")
            .with_storepass("")
            .with_max_memory("")
            .with_alias("");

        let cli = builder().build(&request).unwrap();
        assert_eq!(exposed(&cli), vec!["a.jar"]);
    }

    #[test]
    fn test_common_options_order() {
        let request = JarSignerRequest::verify("a.jar")
            .with_verbose(true)
            .with_keystore("NONE")
            .with_storepass("changeit")
            .with_storetype("PKCS11")
            .with_provider_name("SunPKCS11-NSS")
            .with_provider_class("sun.security.pkcs11.SunPKCS11")
            .with_provider_arg("nss.cfg")
            .with_protected_authentication_path(true)
            .with_max_memory("256m")
            .with_argument("-strict")
            .with_alias("mykey");

        let cli = builder().build(&request).unwrap();

        assert_eq!(
            exposed(&cli),
            vec![
                "-verify",
                "-verbose",
                "-keystore",
                "NONE",
                "-storepass",
                "changeit",
                "-storetype",
                "PKCS11",
                "-providerName",
                "SunPKCS11-NSS",
                "-providerClass",
                "sun.security.pkcs11.SunPKCS11",
                "-providerArg",
                "nss.cfg",
                "-protected",
                "-J-Xmx256m",
                "-strict",
                "a.jar",
                "mykey",
            ]
        );
    }

    #[test]
    fn test_sign_options_between_common_and_archive() {
        let request = JarSignerRequest::sign("a.jar")
            .with_keystore("ks.jks")
            .with_argument("-strict")
            .with_alias("release")
            .with_sign_options(|options| {
                options.keypass = Some(SecretString::from("keysecret"));
                options.sigfile = Some("SIGNER".to_string());
                options.tsa_location = Some("http://tsa.example.com".to_string());
                options.tsa_alias = Some("tsakey".to_string());
                options.tsa_policy_id = Some("1.2.3.4".to_string());
                options.tsa_digest_alg = Some("SHA-256".to_string());
            });

        let cli = builder().build(&request).unwrap();

        assert_eq!(
            exposed(&cli),
            vec![
                "-keystore",
                "ks.jks",
                "-strict",
                "-keypass",
                "keysecret",
                "-sigfile",
                "SIGNER",
                "-tsa",
                "http://tsa.example.com",
                "-tsacert",
                "tsakey",
                "-tsapolicyid",
                "1.2.3.4",
                "-tsadigestalg",
                "SHA-256",
                "a.jar",
                "release",
            ]
        );
        assert!(cli.args()[position(&cli, "-keypass") + 1].is_masked());
        assert!(!cli.to_string().contains("keysecret"));
    }

    #[test]
    fn test_blank_tsa_options_are_omitted() {
        let request = JarSignerRequest::sign("a.jar").with_sign_options(|options| {
            options.sigfile = Some(" ".to_string());
            options.tsa_location = Some("   ".to_string());
            options.tsa_alias = Some("\t".to_string());
            options.tsa_policy_id = Some(String::new());
            options.tsa_digest_alg = Some(" ".to_string());
        });

        let cli = builder().build(&request).unwrap();

        // sigfile only needs to be non-empty
        assert_eq!(exposed(&cli), vec!["-sigfile", " ", "a.jar"]);
    }

    #[test]
    fn test_signedjar_and_certchain_are_absolute() {
        let request = JarSignerRequest::sign("a.jar").with_sign_options(|options| {
            options.signedjar = Some(PathBuf::from("target/signed.jar"));
            options.certchain = Some(PathBuf::from("/etc/pki/chain.pem"));
        });

        let cli = builder().build(&request).unwrap();

        let signedjar = cli.args()[position(&cli, "-signedjar") + 1].expose();
        assert!(Path::new(signedjar).is_absolute());
        assert!(Path::new(signedjar).ends_with("target/signed.jar"));
        assert_eq!(cli.args()[position(&cli, "-certchain") + 1].expose(), "/etc/pki/chain.pem");
        assert!(position(&cli, "-certchain") < position(&cli, "a.jar"));
    }

    #[test]
    fn test_tsa_whitespace_follows_java_rules() {
        let request = JarSignerRequest::sign("a.jar").with_sign_options(|options| {
            options.tsa_location = Some("\u{A0}".to_string());
            options.tsa_alias = Some("\u{1F}\u{2003}".to_string());
            options.tsa_policy_id = Some("\u{202F}".to_string());
        });

        let cli = builder().build(&request).unwrap();

        assert_eq!(
            exposed(&cli),
            vec!["-tsa", "\u{A0}", "-tsapolicyid", "\u{202F}", "a.jar"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_reach_the_process_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let archive = PathBuf::from(OsStr::from_bytes(b"caf\xe9.jar"));
        let signedjar = PathBuf::from(OsStr::from_bytes(b"/out/sign\xe9d.jar"));
        let request = JarSignerRequest::sign(&archive)
            .with_sign_options(|options| options.signedjar = Some(signedjar.clone()));

        let command = builder().build(&request).unwrap().to_command();
        let args: Vec<&OsStr> = command.get_args().collect();

        assert_eq!(
            args,
            vec![
                OsStr::new("-signedjar"),
                signedjar.as_os_str(),
                archive.as_os_str(),
            ]
        );
    }

    #[test]
    fn test_verify_flag_first_and_certs() {
        let request = JarSignerRequest::verify("a.jar").with_verbose(true);
        let cli = builder().build(&request).unwrap();
        assert_eq!(exposed(&cli), vec!["-verify", "-verbose", "a.jar"]);

        let request = JarSignerRequest::verify("a.jar")
            .with_argument("-strict")
            .with_verify_options(|options| options.certs = true)
            .with_alias("mykey");
        let cli = builder().build(&request).unwrap();
        assert_eq!(exposed(&cli), vec!["-verify", "-strict", "-certs", "a.jar", "mykey"]);
    }

    #[test]
    fn test_working_directory_is_copied() {
        let request = JarSignerRequest::verify("a.jar").with_working_directory("/srv/build");
        let cli = builder().build(&request).unwrap();
        assert_eq!(cli.working_directory(), Some(Path::new("/srv/build")));

        let cli = builder().build(&JarSignerRequest::verify("a.jar")).unwrap();
        assert!(cli.working_directory().is_none());
    }

    #[test]
    fn test_missing_executable() {
        let result = CommandLineBuilder::new().build(&JarSignerRequest::sign("a.jar"));
        assert!(matches!(
            result,
            Err(JarSignerError::Configuration(message)) if message.contains("executable")
        ));
    }

    #[test]
    fn test_missing_logger() {
        let mut builder = builder();
        builder.set_logger(None);

        let result = builder.build(&JarSignerRequest::sign("a.jar"));
        assert!(matches!(
            result,
            Err(JarSignerError::Configuration(message)) if message.contains("logger")
        ));
    }

    #[test]
    fn test_logged_command_line_is_masked() {
        let mut builder = builder();
        builder.set_logger(Some(&CAPTURE));

        let request = JarSignerRequest::sign("logged.jar")
            .with_storepass("storesecret")
            .with_sign_options(|options| options.keypass = Some(SecretString::from("keysecret")));
        builder.build(&request).unwrap();

        let lines = CAPTURE.lines.lock().unwrap();
        let line = lines.iter().find(|l| l.contains("logged.jar")).unwrap();
        assert!(line.contains("-storepass *****"));
        assert!(line.contains("-keypass *****"));
        assert!(!line.contains("storesecret"));
        assert!(!line.contains("keysecret"));
    }
}

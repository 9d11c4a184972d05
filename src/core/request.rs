//! Request types describing a single jarsigner invocation
//!
//! A [`JarSignerRequest`] carries the options every jarsigner mode understands and a
//! [`RequestKind`] payload with the options specific to signing or verifying.
//! Options set to `None` or to an empty string are left off the command line.

use secrecy::SecretString;
use std::path::PathBuf;

/// Options controlling one jarsigner invocation
#[derive(Debug, Clone)]
pub struct JarSignerRequest {
    /// Archive to sign or verify
    pub archive: PathBuf,

    /// Keystore alias, passed as the last positional argument
    pub alias: Option<String>,

    /// Keystore location (`-keystore`)
    pub keystore: Option<String>,

    /// Keystore password (`-storepass`), always masked when rendered
    pub storepass: Option<SecretString>,

    /// Keystore type (`-storetype`)
    pub storetype: Option<String>,

    /// Cryptographic service provider name (`-providerName`)
    pub provider_name: Option<String>,

    /// Cryptographic service provider class (`-providerClass`)
    pub provider_class: Option<String>,

    /// Argument for the provider class (`-providerArg`)
    pub provider_arg: Option<String>,

    /// Enable verbose output (`-verbose`)
    pub verbose: bool,

    /// Keystore password is entered through a protected path (`-protected`)
    pub protected_authentication_path: bool,

    /// Maximum heap of the jarsigner JVM, e.g. "512m" (`-J-Xmx`)
    pub max_memory: Option<String>,

    /// Extra arguments appended verbatim after the common options
    pub arguments: Vec<String>,

    /// Working directory of the jarsigner process
    pub working_directory: Option<PathBuf>,

    /// Sign or verify specific options
    pub kind: RequestKind,
}

/// Mode of a jarsigner invocation and its specific options
#[derive(Debug, Clone)]
pub enum RequestKind {
    Sign(SignOptions),
    Verify(VerifyOptions),
}

/// Options only understood when signing
#[derive(Debug, Clone, Default)]
pub struct SignOptions {
    /// Private key password (`-keypass`), always masked when rendered
    pub keypass: Option<SecretString>,

    /// Base name of the generated .SF and signature block files (`-sigfile`)
    pub sigfile: Option<String>,

    /// URL of the Time Stamping Authority (`-tsa`)
    pub tsa_location: Option<String>,

    /// Keystore alias of the TSA certificate (`-tsacert`)
    pub tsa_alias: Option<String>,

    /// OID of the policy the TSA should use (`-tsapolicyid`)
    pub tsa_policy_id: Option<String>,

    /// Message digest algorithm for the TSA (`-tsadigestalg`, Java 11+)
    pub tsa_digest_alg: Option<String>,

    /// Write the signed archive here instead of in place (`-signedjar`)
    pub signedjar: Option<PathBuf>,

    /// Certificate chain file used while signing (`-certchain`)
    pub certchain: Option<PathBuf>,
}

/// Options only understood when verifying
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// List certificate details (`-certs`)
    pub certs: bool,
}

impl JarSignerRequest {
    /// Creates a request signing `archive`
    ///
    /// # Examples
    ///
    /// ```
    /// use jarsigner_command::{JarSignerRequest, RequestKind};
    ///
    /// let request = JarSignerRequest::sign("app.jar").with_alias("release");
    /// assert!(matches!(request.kind, RequestKind::Sign(_)));
    /// ```
    pub fn sign(archive: impl Into<PathBuf>) -> Self {
        Self::new(archive, RequestKind::Sign(SignOptions::default()))
    }

    /// Creates a request verifying `archive`
    pub fn verify(archive: impl Into<PathBuf>) -> Self {
        Self::new(archive, RequestKind::Verify(VerifyOptions::default()))
    }

    fn new(archive: impl Into<PathBuf>, kind: RequestKind) -> Self {
        Self {
            archive: archive.into(),
            alias: None,
            keystore: None,
            storepass: None,
            storetype: None,
            provider_name: None,
            provider_class: None,
            provider_arg: None,
            verbose: false,
            protected_authentication_path: false,
            max_memory: None,
            arguments: Vec::new(),
            working_directory: None,
            kind,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_keystore(mut self, keystore: impl Into<String>) -> Self {
        self.keystore = Some(keystore.into());
        self
    }

    pub fn with_storepass(mut self, storepass: impl Into<String>) -> Self {
        self.storepass = Some(SecretString::from(storepass.into()));
        self
    }

    pub fn with_storetype(mut self, storetype: impl Into<String>) -> Self {
        self.storetype = Some(storetype.into());
        self
    }

    pub fn with_provider_name(mut self, provider_name: impl Into<String>) -> Self {
        self.provider_name = Some(provider_name.into());
        self
    }

    pub fn with_provider_class(mut self, provider_class: impl Into<String>) -> Self {
        self.provider_class = Some(provider_class.into());
        self
    }

    pub fn with_provider_arg(mut self, provider_arg: impl Into<String>) -> Self {
        self.provider_arg = Some(provider_arg.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_protected_authentication_path(mut self, protected: bool) -> Self {
        self.protected_authentication_path = protected;
        self
    }

    pub fn with_max_memory(mut self, max_memory: impl Into<String>) -> Self {
        self.max_memory = Some(max_memory.into());
        self
    }

    /// Appends an extra argument passed to jarsigner as-is
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn with_working_directory(mut self, working_directory: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(working_directory.into());
        self
    }

    /// Applies `f` to the sign options; has no effect on verify requests
    pub fn with_sign_options(mut self, f: impl FnOnce(&mut SignOptions)) -> Self {
        if let RequestKind::Sign(options) = &mut self.kind {
            f(options);
        }
        self
    }

    /// Applies `f` to the verify options; has no effect on sign requests
    pub fn with_verify_options(mut self, f: impl FnOnce(&mut VerifyOptions)) -> Self {
        if let RequestKind::Verify(options) = &mut self.kind {
            f(options);
        }
        self
    }

    /// Returns "sign" or "verify"
    pub fn mode(&self) -> &'static str {
        match self.kind {
            RequestKind::Sign(_) => "sign",
            RequestKind::Verify(_) => "verify",
        }
    }
}

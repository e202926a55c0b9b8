use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Everything that can go wrong while handling a single post URL.
///
/// None of these are fatal to the program: the main loop reports them
/// and moves on to the next URL.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Empty URL provided.")]
    #[diagnostic(code(sedot::empty_input))]
    EmptyInput,

    #[error("sedot does not support the domain in '{url}'")]
    #[diagnostic(
        code(sedot::unsupported_domain),
        help("Pass a full Instagram or Threads post URL.")
    )]
    UnsupportedDomain { url: String },

    #[error("Unable to locate video URL in the page metadata of {url}")]
    #[diagnostic(code(sedot::resolution_failure))]
    ResolutionFailure { url: String },

    #[error("Network error while requesting {url}")]
    #[diagnostic(code(sedot::network))]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP error {status} while requesting {url}")]
    #[diagnostic(code(sedot::remote))]
    Remote { url: String, status: u16 },

    #[error("{} already exists", path.display())]
    #[diagnostic(
        code(sedot::already_exists),
        help("Use --overwrite to replace it.")
    )]
    AlreadyExists { path: PathBuf },

    #[error("I/O error on {}", path.display())]
    #[diagnostic(code(sedot::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    pub fn network<E>(url: &str) -> impl FnOnce(E) -> Self + '_
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| Error::Network {
            url: url.to_owned(),
            source: Box::new(source),
        }
    }

    /// Whether the error means the URL was skipped rather than broken
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }

    /// One line describing the error, including the help text if any
    pub fn report_line(&self) -> String {
        let mut line = self.to_string();
        if let Some(source) = std::error::Error::source(self) {
            line.push_str(&format!(": {source}"));
        }
        if let Some(help) = self.help() {
            line.push_str(&format!(". {help}"));
        }
        line
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageKbError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),

    #[error("PDF read error: {0}")]
    PdfReadError(String),

    #[error("PDF write error: {0}")]
    PdfWriteError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error(
        "no size improvement: rebuilt document is {rebuilt} bytes, source is {original} bytes \
         (the source is already well optimized; try a lower quality setting)"
    )]
    NoImprovement { original: usize, rebuilt: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`ImageKbError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl ImageKbError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create an invalid-parameter error.
    invalid_parameter => InvalidParameter,
    /// Create a decode error.
    decode => DecodeError,
    /// Create an encode error.
    encode => EncodeError,
    /// Create an unsupported-container error.
    unsupported_container => UnsupportedContainer,
    /// Create a PDF read error.
    pdf_read => PdfReadError,
    /// Create a PDF write error.
    pdf_write => PdfWriteError,
    /// Create a render error.
    render => RenderError,
}

impl From<lopdf::Error> for ImageKbError {
    fn from(e: lopdf::Error) -> Self {
        Self::PdfReadError(e.to_string())
    }
}

impl From<serde_yml::Error> for ImageKbError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

#[cfg(feature = "render")]
impl From<pdfium_render::prelude::PdfiumError> for ImageKbError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RenderError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImageKbError>;

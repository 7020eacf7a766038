use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrunchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode/encode PNG '{path}': {source}")]
    Png {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "texture '{name}' ({width}x{height}, padded) does not fit in a {max_size}x{max_size} atlas"
    )]
    OversizedBitmap {
        name: String,
        width: u32,
        height: u32,
        max_size: u32,
    },
}

pub type Result<T> = std::result::Result<T, CrunchError>;

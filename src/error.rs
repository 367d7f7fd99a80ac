use thiserror::Error;

pub type Result<T> = std::result::Result<T, AugmentError>;

#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("malformed input: {len} bytes cannot be split into 16-bit samples")]
    MalformedInput { len: usize },

    #[error("sample {value} at index {index} is outside the 16-bit range")]
    EncodingRange { index: usize, value: i32 },

    #[error("wobble schedule has no entries")]
    EmptySchedule,

    #[error("factor must be finite and positive, got {0}")]
    InvalidFactor(f64),

    #[error("wobble duration must lie in (0, 1], got {0}")]
    InvalidDuration(f64),

    #[error("factor {factor} would stretch the sequence to {length} samples")]
    LengthOverflow { factor: f64, length: f64 },

    #[error("invalid factor range [{low}, {high})")]
    InvalidRange { low: f64, high: f64 },

    #[error("requested {requested} unique factors but the domain only holds {available}")]
    DomainExhausted { requested: usize, available: u64 },

    #[error("no fresh factor found after {attempts} attempts")]
    SamplerExhausted { attempts: usize },

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

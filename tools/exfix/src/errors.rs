use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixError {
    #[error("read transcript: {0}")]
    Input(String),
    #[error("list candidate files: {0}")]
    Discovery(String),
    #[error("read source: {0}")]
    Read(String),
    #[error("write source: {0}")]
    Write(String),
    #[error("close source: {0}")]
    Close(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("read config: {0}")]
    ConfigRead(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("cli error: {0}")]
    Cli(String),
}

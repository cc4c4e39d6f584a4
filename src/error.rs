use parse_display::Display;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum LabError {
    #[display("the mutability harness is already running")]
    AlreadyRunning,

    #[display("failed to read config `{path}`: {message}")]
    ReadConfig { path: String, message: String },

    #[display("invalid config: {message}")]
    InvalidConfig { message: String },

    #[display("failed to start logger: {message}")]
    Logger { message: String },
}

impl std::error::Error for LabError {}

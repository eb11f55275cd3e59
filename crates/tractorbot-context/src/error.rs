use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Failed to read context file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    
    #[error("Invalid context file at line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, ContextError>;

use std::io;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("buffer: full")]
    ErrBufferFull,
    #[error("buffer: closed")]
    ErrBufferClosed,
    #[error("buffer: short")]
    ErrBufferShort,
    #[error("packet too big")]
    ErrPacketTooBig,
    #[error("too many chunks")]
    ErrTooManyChunks,
    #[error("io EOF")]
    ErrIoEof,
    #[error("mux: no endpoint matched")]
    ErrMuxNoEndpointMatched,
    #[error("obs cannot be nil")]
    ErrObsCannotBeNil,
    #[error("use of closed network connection")]
    ErrUseClosedNetworkConn,
    #[error("{0}")]
    Other(String),
    #[error("io error: {0}")]
    Io(#[from] IoError),
}

impl Error {
    pub fn from_std<T>(error: T) -> Self
    where
        T: std::error::Error + Send + Sync + 'static,
    {
        Error::Io(IoError(io::Error::other(error.to_string())))
    }

    pub fn equal_to(&self, err: &(dyn std::error::Error + Send + Sync)) -> bool {
        self.to_string() == err.to_string()
    }
}

#[derive(Debug)]
pub struct IoError(pub io::Error);

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Clone for Error {
    fn clone(&self) -> Self {
        Error::Other(self.to_string())
    }
}

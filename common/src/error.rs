use thiserror::Error;

/// Terminal failures of a routing request. None of these leave a partial
/// layout behind; the caller gets the whole result or one of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("malformed topology: {0}")]
    MalformedTopology(String),

    #[error("vertical constraint cycle cannot be broken: no free contact inside any cycle segment")]
    UnresolvableCycle,

    #[error("track scheduler made no progress with {remaining} segments unplaced")]
    SchedulingStall { remaining: usize },
}

pub mod probe;
pub mod registry;
pub mod result;
pub mod transport;

pub mod prelude {
    pub use super::probe::probe_all;
    pub use super::registry::{PROBES, ProbeDefinition, ProbeMethod, ProbeVars};
    pub use super::result::{ProbeResult, Response};
    pub use super::transport::{build_client, send};
}

use std::fmt::Write;

/// Flattens an error and its sources into a single message.
pub(crate) fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::report;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn report_walks_the_source_chain() {
        let err = Outer(std::io::Error::other("inner"));
        assert_eq!(report(&err), "outer\n\nCaused by: inner");
    }
}

//! Correlation engine.
//!
//! Each resource kind builds its indices over an immutable snapshot of both
//! inventories, then runs a forward scan (local to remote) followed by a
//! backward scan (remote to local). Scans are synchronous and never fail;
//! everything they notice goes to the [`FindingSink`](crate::FindingSink).

pub mod router;
pub mod subnet;

/// Separator between the router id and the CMS id in a domain external id.
pub const COMPOSITE_DELIMITER: char = '@';

/// Builds the external id a controller domain carries for a local router.
pub fn composite_external_id(local_id: &str, correlation_id: &str) -> String {
    format!("{}{}{}", local_id, COMPOSITE_DELIMITER, correlation_id)
}

/// Splits a composite external id into `(local_id, correlation_id)`.
///
/// Returns `None` unless the id has exactly two non-empty parts.
pub fn parse_external_id(external_id: &str) -> Option<(&str, &str)> {
    let mut parts = external_id.split(COMPOSITE_DELIMITER);
    let local_id = parts.next()?;
    let correlation_id = parts.next()?;
    if parts.next().is_some() || local_id.is_empty() || correlation_id.is_empty() {
        return None;
    }
    Some((local_id, correlation_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_round_trip() {
        let id = composite_external_id("9b1c-77", "cms-bj");
        assert_eq!(id, "9b1c-77@cms-bj");
        assert_eq!(parse_external_id(&id), Some(("9b1c-77", "cms-bj")));
    }

    #[test]
    fn test_malformed_external_ids() {
        for bad in ["", "r1", "r1@", "@cms1", "@", "r1@cms1@x", "r1@@cms1"] {
            assert_eq!(parse_external_id(bad), None, "{:?} should not parse", bad);
        }
    }
}

// JSON Output Module

use crate::Result;
use serde::Serialize;

/// Generate JSON output from any scan result type
pub fn generate_json<T: Serialize + ?Sized>(results: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(results)?)
    } else {
        Ok(serde_json::to_string(results)?)
    }
}

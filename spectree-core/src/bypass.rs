use crate::config::Mode;
use crate::meta::{InstanceId, RouteMeta};

/// Whether the instance `owner` leaves a route out of its document.
///
/// - `normal`: skip routes decorated by another instance
/// - `greedy`: skip nothing
/// - `strict`: skip everything not decorated by `owner`
pub fn should_skip(mode: Mode, owner: InstanceId, meta: Option<&RouteMeta>) -> bool {
    let decorated_by = meta.map(|meta| meta.owner);
    match mode {
        Mode::Greedy => false,
        Mode::Strict => decorated_by != Some(owner),
        Mode::Normal => decorated_by.is_some_and(|id| id != owner),
    }
}

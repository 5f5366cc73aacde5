//! Priority tier partitioning

use crate::config::DeployConfig;

/// Reorder services by priority tier
///
/// One stable pass: each name lands in the high tier if listed there, else
/// mid, else low, else the base bucket. The result is
/// `high ++ mid ++ low ++ base`, each bucket keeping encounter order.
pub fn partition_by_priority(config: &DeployConfig, services: Vec<String>) -> Vec<String> {
    let mut high = Vec::new();
    let mut mid = Vec::new();
    let mut low = Vec::new();
    let mut base = Vec::new();

    for name in services {
        let bucket = if config.high_priority_deps.contains(&name) {
            &mut high
        } else if config.mid_priority_deps.contains(&name) {
            &mut mid
        } else if config.low_priority_deps.contains(&name) {
            &mut low
        } else {
            &mut base
        };
        bucket.push(name);
    }

    high.extend(mid);
    high.extend(low);
    high.extend(base);
    high
}

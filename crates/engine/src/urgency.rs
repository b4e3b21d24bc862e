//! Urgency markers: words that raise the escalation score regardless of department.

/// Distinct markers found in `lowered`, in marker-list order.
///
/// Plain substring containment, so "dangerously" counts as "danger".
pub fn find_markers<'a>(lowered: &str, markers: &'a [String]) -> Vec<&'a str> {
    let mut found: Vec<&str> = Vec::new();
    for marker in markers {
        if !marker.is_empty() && lowered.contains(marker.as_str()) && !found.contains(&marker.as_str())
        {
            found.push(marker.as_str());
        }
    }
    found
}

/// Total bonus for `count` distinct markers. Not capped here.
pub fn urgency_bonus(count: usize, per_marker: u32) -> u32 {
    (count as u32).saturating_mul(per_marker)
}

//! KPI column naming.

/// Raw KPI column ids as recorded in the `csv` collection, in display order.
pub const GRAPH_COLUMNS: [&str; 6] = [
    "rx_brate uplink [Mbps]",
    "ul_sinr",
    "sum_requested_prbs",
    "tx_brate downlink [Mbps]",
    "ul_mcs",
    "sum_granted_prbs",
];

/// Column holding the resource blocks assigned to the slice.
pub const RBS_ASSIGNED_COLUMN: &str = "slice_prb";

/// Column holding the scheduling policy code.
pub const SCHEDULING_POLICY_COLUMN: &str = "scheduling_policy";

const ACRONYMS: [&str; 6] = ["rx", "ul", "prb", "tx", "sinr", "mcs"];

/// Turn a raw column id into its display name.
///
/// The result doubles as the lookup key for loaded series, so the mapping is
/// pure and leaves already formatted names unchanged.
pub fn format_column_name(raw: &str) -> String {
    let stripped = raw.replace("sum_", "").replace(" [Mbps]", "").replace('_', " ");
    let tokens: Vec<String> = stripped
        .split_whitespace()
        .map(|token| {
            if ACRONYMS.contains(&token) {
                token.to_uppercase()
            } else {
                capitalize(token)
            }
        })
        .collect();

    if tokens.iter().any(|token| token == "Prbs") {
        return match tokens.iter().find(|token| *token != "Prbs") {
            Some(other) => format!("PRB {other}"),
            None => "PRB".to_string(),
        };
    }
    tokens.join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

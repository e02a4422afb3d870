use crate::models::complaint::Complaint;

pub const HEADERS: [&str; 11] = [
    "ID",
    "Date",
    "Status",
    "User Name",
    "Room",
    "Section",
    "Product Type",
    "Product S/N",
    "Problem",
    "Solution",
    "Representative",
];

/// Quote a field when it contains a delimiter, a quote or a line break.
/// Inner quotes are doubled.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header line plus one line per complaint, joined by `\n`.
pub fn to_csv(complaints: &[Complaint]) -> String {
    let mut lines = Vec::with_capacity(complaints.len() + 1);
    lines.push(HEADERS.join(","));

    for c in complaints {
        let row = [
            c.id.to_string(),
            c.created_display(),
            c.status.to_string(),
            c.user_name.clone(),
            c.room_number.clone(),
            c.section.clone(),
            c.product_type.clone(),
            c.product_serial_number.clone(),
            c.problem_description.clone(),
            c.solution.clone(),
            c.representative_name.clone(),
        ];
        let escaped: Vec<String> = row.iter().map(|f| escape_field(f)).collect();
        lines.push(escaped.join(","));
    }

    lines.join("\n")
}

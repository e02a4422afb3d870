use crate::models::complaint::Complaint;

pub const RULE: &str = "------------------------------------";

fn block(c: &Complaint) -> String {
    format!(
        "ID: {}\n\
         Date: {}\n\
         Status: {}\n\
         User: {}\n\
         Room: {}\n\
         Section: {}\n\
         Product Type: {}\n\
         Product S/N: {}\n\
         Problem: {}\n\
         Solution: {}\n\
         Representative: {}\n\
         {RULE}",
        c.id,
        c.created_display(),
        c.status,
        c.user_name,
        c.room_number,
        c.section,
        c.product_type,
        c.product_serial_number,
        c.problem_description,
        c.solution,
        c.representative_name,
    )
}

/// One block per complaint, separated by a blank line.
pub fn to_txt(complaints: &[Complaint]) -> String {
    complaints.iter().map(block).collect::<Vec<_>>().join("\n\n")
}

/// Replace full-width digits (０-９) with their ASCII counterparts.
/// Everything else passes through untouched.
pub fn to_half_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

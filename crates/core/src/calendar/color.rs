/// Palette category colours are picked from.
const PALETTE: [&str; 16] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#84CC16", "#06B6D4", "#E11D48", "#A855F7", "#22C55E", "#EAB308", "#0EA5E9",
];

/// Returns the display colour for a category name.
///
/// The colour depends only on the name (FNV-1a hash into a fixed palette),
/// so the same category renders the same way across sessions.
pub fn generate_color(name: &str) -> String {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in name.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    PALETTE[(hash as usize) % PALETTE.len()].to_string()
}

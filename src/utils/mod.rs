pub mod date;
pub mod html;
pub mod mime;
pub mod path;

/// `1 path`, `3 paths`
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

//! Collision-free naming for newly created entries

/// Pick a name that does not collide with an existing entry
///
/// Returns `name` unchanged when it is free, otherwise inserts a counter
/// before the extension: `report.pdf` becomes `report (1).pdf`, then
/// `report (2).pdf` and so on. Names without an extension, and dotfiles such
/// as `.profile`, get the counter appended at the end.
///
/// # Examples
///
/// ```
/// use archivist_domain::unique_name;
///
/// let taken = ["a.txt", "a (1).txt"];
/// assert_eq!(unique_name("a.txt", |n| taken.contains(&n)), "a (2).txt");
/// assert_eq!(unique_name("b.txt", |n| taken.contains(&n)), "b.txt");
/// ```
pub fn unique_name<F>(name: &str, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !exists(name) {
        return name.to_string();
    }

    let (stem, extension) = match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    };

    let mut counter = 1u64;
    loop {
        let candidate = format!("{} ({}){}", stem, counter, extension);
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_name_is_kept() {
        assert_eq!(unique_name("photo.jpg", |_| false), "photo.jpg");
    }

    #[test]
    fn test_counter_before_extension() {
        assert_eq!(unique_name("photo.jpg", |n| n == "photo.jpg"), "photo (1).jpg");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(unique_name("README", |n| n == "README"), "README (1)");
    }

    #[test]
    fn test_dotfile() {
        assert_eq!(unique_name(".profile", |n| n == ".profile"), ".profile (1)");
    }

    #[test]
    fn test_multiple_collisions() {
        let taken = ["x.tar.gz", "x.tar (1).gz", "x.tar (2).gz"];
        assert_eq!(unique_name("x.tar.gz", |n| taken.contains(&n)), "x.tar (3).gz");
    }
}
